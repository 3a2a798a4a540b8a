//! Pointer-event state machine for the interactive view.
//!
//! Two tools (select, pan) plus an orthogonal eyedropper mode that preempts
//! both. The controller translates pointer events into typed updates; it
//! never touches the configuration or the compositor itself, the embedding
//! applies the updates. Pointer coordinates arrive in display space; image
//! drags are corrected by the display-to-canvas scale so a CSS-resized
//! surface still drags 1:1 in canvas pixels.

use crate::render::compositor::Compositor;

/// Active tool of the interactive view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Select,
    Pan,
}

/// What a pointer event asks the embedding to change.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerUpdate {
    /// Nothing to apply.
    None,
    /// New view pan, display-space pixels.
    Pan { x: f64, y: f64 },
    /// New portrait offset, canvas-space pixels.
    ImageOffset { x: f64, y: f64 },
    /// Eyedropper result as `#rrggbb`.
    ColorPicked(String),
}

/// Snapshot of the state a pointer-down decision depends on.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerContext {
    pub pan_x: f64,
    pub pan_y: f64,
    /// Current portrait offset, present only when an image layer exists.
    pub image_offset: Option<(f64, f64)>,
}

#[derive(Clone, Copy, Debug)]
enum Drag {
    Pan {
        start_x: f64,
        start_y: f64,
        origin_x: f64,
        origin_y: f64,
    },
    Image {
        start_x: f64,
        start_y: f64,
        origin_x: f64,
        origin_y: f64,
    },
}

/// Translates pointer events into view or layer updates.
#[derive(Debug)]
pub struct InteractionController {
    tool: Tool,
    eyedropper: bool,
    /// Canvas pixels per display pixel.
    display_scale: f64,
    selection: Option<String>,
    drag: Option<Drag>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            tool: Tool::Select,
            eyedropper: false,
            display_scale: 1.0,
            selection: None,
            drag: None,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. Any in-flight drag ends; switching mid-drag is not a
    /// defined transition.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.drag = None;
    }

    /// Canvas pixels per display pixel (canvas size / displayed size).
    pub fn set_display_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.display_scale = scale;
        }
    }

    /// Select a layer by id (or clear), as transient UI state.
    pub fn set_selection(&mut self, layer_id: Option<&str>) {
        self.selection = layer_id.map(str::to_string);
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Arm the eyedropper; the next pointer-down samples instead of
    /// starting a drag.
    pub fn begin_eyedropper(&mut self) {
        self.eyedropper = true;
        self.drag = None;
    }

    pub fn eyedropper_active(&self) -> bool {
        self.eyedropper
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer pressed at display coordinates `(x, y)`.
    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        ctx: &PointerContext,
        surface: &Compositor,
    ) -> PointerUpdate {
        if self.eyedropper {
            self.eyedropper = false;
            let cx = x * self.display_scale;
            let cy = y * self.display_scale;
            return match surface.sample_hex(cx, cy) {
                Some(hex) => PointerUpdate::ColorPicked(hex),
                None => PointerUpdate::None,
            };
        }

        match self.tool {
            Tool::Pan => {
                self.drag = Some(Drag::Pan {
                    start_x: x,
                    start_y: y,
                    origin_x: ctx.pan_x,
                    origin_y: ctx.pan_y,
                });
            }
            Tool::Select => {
                if self.selection.as_deref() == Some("image")
                    && let Some((ix, iy)) = ctx.image_offset
                {
                    self.drag = Some(Drag::Image {
                        start_x: x,
                        start_y: y,
                        origin_x: ix,
                        origin_y: iy,
                    });
                }
            }
        }
        PointerUpdate::None
    }

    /// Pointer moved to display coordinates `(x, y)`.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> PointerUpdate {
        match self.drag {
            Some(Drag::Pan {
                start_x,
                start_y,
                origin_x,
                origin_y,
            }) => PointerUpdate::Pan {
                x: origin_x + (x - start_x),
                y: origin_y + (y - start_y),
            },
            Some(Drag::Image {
                start_x,
                start_y,
                origin_x,
                origin_y,
            }) => PointerUpdate::ImageOffset {
                x: origin_x + (x - start_x) * self.display_scale,
                y: origin_y + (y - start_y) * self.display_scale,
            },
            None => PointerUpdate::None,
        }
    }

    /// Pointer released: any active drag ends unconditionally.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Pointer left the surface; treated exactly like a release.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }
}

#[cfg(test)]
#[path = "../tests/unit/interaction.rs"]
mod tests;
