//! The compositor owns the raster surface and paints the layer list.
//!
//! Rendering is a sequence of scene batches: layers are recorded into a
//! `vello_cpu` scene under the global view transform and flushed onto the
//! destination pixmap with premultiplied source-over. Drop shadows force a
//! batch boundary because the shadow is synthesized from the rasterized
//! fill pass. Re-running a render with unchanged layers, view and size
//! produces byte-identical output.

use kurbo::Affine;

use crate::config::{BackgroundKind, RibbonStyle};
use crate::foundation::core::{
    CanvasSize, Rgba8, ViewTransform, format_hex_rgb, parse_hex_rgb,
};
use crate::foundation::error::{RingletError, RingletResult};
use crate::geometry::{
    ARC_FADE_SEGMENTS, arc_band, arc_glyph_slots, badge_box, cover_fit_rect, deg_to_rad,
    faded_arc_segments, straight_glyph_centers,
};
use crate::layer::{
    BackgroundLayer, ImageLayer, Layer, LayerData, RibbonLayer, TextLayer,
};
use crate::render::FrameRGBA;
use crate::render::paint::{
    affine_to_cpu, arc_path, circle_path, clear_pixmap_to_transparent, horizontal_fade_image,
    pill_path, premul_over_in_place, premul_over_in_place_opacity, rgba_premul_to_image,
    solid_paint, unpremultiply_rgba8_in_place, vertical_gradient_image,
};
use crate::render::shadow::drop_shadow;
use crate::text::{ShapedText, TextLayoutEngine};

/// Constant shadow y offset, matching the product's fixed 2px drop.
const SHADOW_OFFSET_Y: i32 = 2;

/// Owns one raster surface and repaints the layer list on every mutation.
pub struct Compositor {
    size: CanvasSize,
    view: ViewTransform,
    layers: Vec<Layer>,
    frame: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    text_engine: TextLayoutEngine,
    portrait_paint: Option<(usize, vello_cpu::Image, u32, u32)>,
    batch_dirty: bool,
    awaiting_image: bool,
}

impl Compositor {
    /// Construct a compositor with an owned surface of `size` x `size`.
    ///
    /// Failing to obtain the surface (zero or backend-unrepresentable size)
    /// is fatal and aborts construction.
    pub fn new(size: CanvasSize) -> RingletResult<Self> {
        let side: u16 = size.0.try_into().map_err(|_| {
            RingletError::initialization(format!(
                "cannot obtain a {0}x{0} raster surface (backend limit {1})",
                size.0,
                u16::MAX
            ))
        })?;
        if side == 0 {
            return Err(RingletError::initialization(
                "cannot obtain a zero-sized raster surface",
            ));
        }

        Ok(Self {
            size,
            view: ViewTransform::default(),
            layers: Vec::new(),
            frame: vello_cpu::Pixmap::new(side, side),
            scratch: vello_cpu::Pixmap::new(side, side),
            ctx: vello_cpu::RenderContext::new(side, side),
            text_engine: TextLayoutEngine::new(),
            portrait_paint: None,
            batch_dirty: false,
            awaiting_image: false,
        })
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Shaping engine access, e.g. to register a bundled font up front.
    pub fn text_engine_mut(&mut self) -> &mut TextLayoutEngine {
        &mut self.text_engine
    }

    /// Whether the last render skipped the portrait because its decode had
    /// not completed.
    pub fn awaiting_image(&self) -> bool {
        self.awaiting_image
    }

    /// Replace the layer list and repaint.
    pub fn set_layers(&mut self, layers: Vec<Layer>) -> RingletResult<()> {
        self.layers = layers;
        self.render()
    }

    /// Replace the view transform and repaint.
    pub fn set_view(&mut self, view: ViewTransform) -> RingletResult<()> {
        self.view = view;
        self.render()
    }

    pub fn set_zoom(&mut self, zoom: f64) -> RingletResult<()> {
        self.view.zoom = zoom;
        self.render()
    }

    pub fn set_pan(&mut self, x: f64, y: f64) -> RingletResult<()> {
        self.view.pan_x = x;
        self.view.pan_y = y;
        self.render()
    }

    /// Toggle a layer's visibility (transient UI state) and repaint.
    pub fn set_layer_visible(&mut self, id: &str, visible: bool) -> RingletResult<()> {
        for layer in &mut self.layers {
            if layer.id == id {
                layer.visible = visible;
            }
        }
        self.render()
    }

    /// Toggle a layer's lock flag. Locking affects interaction only, so no
    /// repaint happens.
    pub fn set_layer_locked(&mut self, id: &str, locked: bool) {
        for layer in &mut self.layers {
            if layer.id == id {
                layer.locked = locked;
            }
        }
    }

    /// One-shot continuation for the image-decode boundary: re-runs the
    /// render if the last one was waiting on the portrait. Returns whether
    /// a repaint happened. Safe to call spuriously or repeatedly.
    pub fn image_ready(&mut self) -> RingletResult<bool> {
        if !self.awaiting_image {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Clear the surface and repaint every visible layer in z order.
    #[tracing::instrument(skip(self), fields(size = self.size.0, layers = self.layers.len()))]
    pub fn render(&mut self) -> RingletResult<()> {
        clear_pixmap_to_transparent(&mut self.frame);
        self.awaiting_image = false;
        self.begin_batch();

        let view = self.view.to_affine();

        let mut order: Vec<usize> = (0..self.layers.len()).collect();
        order.sort_by_key(|&i| self.layers[i].z_index);

        for i in order {
            let layer = self.layers[i].clone();
            if !layer.visible {
                continue;
            }
            match &layer.data {
                LayerData::Background(bg) => self.paint_background(bg, layer.opacity, view),
                LayerData::Image(img) => self.paint_image(img, layer.opacity, view),
                LayerData::Ribbon(r) => self.paint_ribbon(r, layer.opacity, view)?,
                LayerData::Text(t) => self.paint_text(t, layer.opacity, view),
            }
        }

        self.flush_batch()
    }

    /// Copy of the rendered surface (premultiplied RGBA8).
    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.size.0,
            height: self.size.0,
            data: self.frame.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Premultiplied pixel at integer surface coordinates.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.0 || y >= self.size.0 {
            return None;
        }
        let idx = ((y as usize) * (self.size.0 as usize) + (x as usize)) * 4;
        let data = self.frame.data_as_u8_slice();
        Some([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]])
    }

    /// Sample the rendered pixel under a cursor position as a `#rrggbb`
    /// string (the eyedropper backend).
    pub fn sample_hex(&self, x: f64, y: f64) -> Option<String> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let px = self.pixel_at(x.floor() as u32, y.floor() as u32)?;
        let mut straight = px.to_vec();
        unpremultiply_rgba8_in_place(&mut straight);
        Some(format_hex_rgb(straight[0], straight[1], straight[2]))
    }

    fn begin_batch(&mut self) {
        self.ctx.reset();
        self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.batch_dirty = false;
    }

    /// Rasterize the pending scene batch and source-over it onto the frame.
    fn flush_batch(&mut self) -> RingletResult<()> {
        if !self.batch_dirty {
            self.begin_batch();
            return Ok(());
        }
        clear_pixmap_to_transparent(&mut self.scratch);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.scratch);
        premul_over_in_place(
            self.frame.data_as_u8_slice_mut(),
            self.scratch.data_as_u8_slice(),
        )?;
        self.begin_batch();
        Ok(())
    }

    /// Rasterize the pending scene batch into `scratch` only, leaving the
    /// frame untouched (used to isolate shadow-casting fill passes).
    fn rasterize_batch_to_scratch(&mut self) {
        clear_pixmap_to_transparent(&mut self.scratch);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.scratch);
    }

    fn paint_background(&mut self, bg: &BackgroundLayer, opacity: f64, view: Affine) {
        if matches!(bg.kind, BackgroundKind::Transparent) {
            return;
        }

        let s = self.size.side();
        let clip = circle_path(self.size.center(), self.size.radius());
        self.ctx.set_transform(affine_to_cpu(view));
        self.ctx.push_clip_layer(&clip);
        let pushed_opacity = opacity < 1.0;
        if pushed_opacity {
            self.ctx.push_opacity_layer(opacity as f32);
        }

        match bg.kind {
            BackgroundKind::Solid => {
                if let Some(color) = parse_hex_rgb(&bg.color) {
                    self.ctx.set_paint(solid_paint(color, 1.0));
                    self.ctx
                        .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, s, s));
                    self.batch_dirty = true;
                }
            }
            BackgroundKind::Gradient => {
                if let (Some(start), Some(end)) = (
                    parse_hex_rgb(&bg.gradient_start),
                    parse_hex_rgb(&bg.gradient_end),
                ) && let Ok(paint) = vertical_gradient_image(start, end, self.size.0, self.size.0)
                {
                    self.ctx.set_paint(paint);
                    self.ctx
                        .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, s, s));
                    self.batch_dirty = true;
                }
            }
            BackgroundKind::Transparent => {}
        }

        if pushed_opacity {
            self.ctx.pop_layer();
        }
        self.ctx.pop_layer();
    }

    fn paint_image(&mut self, img: &ImageLayer, opacity: f64, view: Affine) {
        let Some(prepared) = img.handle.get() else {
            tracing::debug!("portrait not decoded yet; repaint deferred");
            self.awaiting_image = true;
            return;
        };

        let key = std::sync::Arc::as_ptr(&prepared.rgba8_premul) as usize;
        let paint = match &self.portrait_paint {
            Some((k, p, _, _)) if *k == key => p.clone(),
            _ => {
                let Ok(p) =
                    rgba_premul_to_image(&prepared.rgba8_premul, prepared.width, prepared.height)
                else {
                    return;
                };
                self.portrait_paint = Some((key, p.clone(), prepared.width, prepared.height));
                p
            }
        };

        let rect = cover_fit_rect(
            self.size.side(),
            prepared.width,
            prepared.height,
            img.scale,
            img.x,
            img.y,
        );
        let (iw, ih) = (prepared.width.max(1), prepared.height.max(1));

        let clip = circle_path(self.size.center(), self.size.radius());
        self.ctx.set_transform(affine_to_cpu(view));
        self.ctx.push_clip_layer(&clip);
        let pushed_opacity = opacity < 1.0;
        if pushed_opacity {
            self.ctx.push_opacity_layer(opacity as f32);
        }

        let local = Affine::translate((rect.x0, rect.y0))
            * Affine::scale_non_uniform(
                rect.width() / f64::from(iw),
                rect.height() / f64::from(ih),
            );
        self.ctx.set_transform(affine_to_cpu(view * local));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(iw),
            f64::from(ih),
        ));
        self.batch_dirty = true;

        if pushed_opacity {
            self.ctx.pop_layer();
        }
        self.ctx.pop_layer();
    }

    fn paint_ribbon(&mut self, r: &RibbonLayer, opacity: f64, view: Affine) -> RingletResult<()> {
        if r.shadow_blur > 0.0 {
            // The shadow is synthesized from the rasterized fill pass, so
            // that pass gets its own batch; borders follow without shadow.
            self.flush_batch()?;
            match r.style {
                RibbonStyle::Arc => self.ribbon_arc_fill(r, view),
                RibbonStyle::Badge => self.ribbon_badge_fill(r, view),
            }
            if self.batch_dirty {
                self.rasterize_batch_to_scratch();
                let shadow = drop_shadow(
                    self.scratch.data_as_u8_slice(),
                    self.size.0,
                    self.size.0,
                    r.shadow_blur,
                    r.shadow_opacity,
                    SHADOW_OFFSET_Y,
                )?;
                premul_over_in_place_opacity(
                    self.frame.data_as_u8_slice_mut(),
                    &shadow,
                    opacity,
                )?;
                premul_over_in_place_opacity(
                    self.frame.data_as_u8_slice_mut(),
                    self.scratch.data_as_u8_slice(),
                    opacity,
                )?;
            }
            self.begin_batch();

            let pushed_opacity = opacity < 1.0;
            if pushed_opacity {
                self.ctx.push_opacity_layer(opacity as f32);
            }
            match r.style {
                RibbonStyle::Arc => self.ribbon_arc_borders(r, view),
                RibbonStyle::Badge => self.ribbon_badge_border(r, view),
            }
            if pushed_opacity {
                self.ctx.pop_layer();
            }
            return Ok(());
        }

        let pushed_opacity = opacity < 1.0;
        if pushed_opacity {
            self.ctx.push_opacity_layer(opacity as f32);
        }
        match r.style {
            RibbonStyle::Arc => {
                self.ribbon_arc_fill(r, view);
                self.ribbon_arc_borders(r, view);
            }
            RibbonStyle::Badge => {
                self.ribbon_badge_fill(r, view);
                self.ribbon_badge_border(r, view);
            }
        }
        if pushed_opacity {
            self.ctx.pop_layer();
        }
        Ok(())
    }

    fn ribbon_arc_fill(&mut self, r: &RibbonLayer, view: Affine) {
        let Some(color) = parse_hex_rgb(&r.color) else {
            return;
        };
        let band = arc_band(self.size.side(), r.thickness);
        if band.thickness <= 0.0 || r.arc_width <= 0.0 {
            return;
        }
        let center = self.size.center();

        self.ctx.set_transform(affine_to_cpu(view));
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(band.thickness)
                .with_caps(vello_cpu::kurbo::Cap::Butt),
        );

        if r.use_gradient {
            for seg in faded_arc_segments(
                r.start_angle,
                r.arc_width,
                r.gradient_fade_percent,
                ARC_FADE_SEGMENTS,
            ) {
                if seg.alpha <= 0.0 {
                    continue;
                }
                self.ctx.set_paint(solid_paint(color, seg.alpha));
                self.ctx
                    .stroke_path(&arc_path(center, band.centerline, seg.start, seg.sweep));
            }
        } else {
            self.ctx.set_paint(solid_paint(color, 1.0));
            self.ctx.stroke_path(&arc_path(
                center,
                band.centerline,
                deg_to_rad(r.start_angle),
                deg_to_rad(r.arc_width),
            ));
        }
        self.batch_dirty = true;
    }

    fn ribbon_arc_borders(&mut self, r: &RibbonLayer, view: Affine) {
        if r.border_width <= 0.0 {
            return;
        }
        let Some(color) = parse_hex_rgb(&r.border_color) else {
            return;
        };
        let band = arc_band(self.size.side(), r.thickness);
        if r.arc_width <= 0.0 {
            return;
        }
        let center = self.size.center();
        let start = deg_to_rad(r.start_angle);
        let sweep = deg_to_rad(r.arc_width);

        self.ctx.set_transform(affine_to_cpu(view));
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(r.border_width).with_caps(vello_cpu::kurbo::Cap::Butt),
        );
        self.ctx.set_paint(solid_paint(color, 1.0));
        self.ctx
            .stroke_path(&arc_path(center, band.outer, start, sweep));
        self.ctx
            .stroke_path(&arc_path(center, band.inner, start, sweep));
        self.batch_dirty = true;
    }

    fn badge_frame(&mut self, r: &RibbonLayer) -> (f64, f64, f64, Affine) {
        let text_width = if r.badge_text.content.is_empty() {
            0.0
        } else {
            self.text_engine.measure(
                &r.badge_text.content,
                &r.badge_text.font_family,
                r.badge_text.font_size as f32,
                r.badge_text.letter_spacing,
            )
        };
        let (w, h, corner) = badge_box(text_width, r.badge_text.font_size);
        let center = self.size.center();
        let local = Affine::translate((center.x, center.y + r.badge_offset_y))
            * Affine::rotate(deg_to_rad(r.badge_rotation))
            * Affine::translate((-w / 2.0, -h / 2.0));
        (w, h, corner, local)
    }

    fn ribbon_badge_fill(&mut self, r: &RibbonLayer, view: Affine) {
        let Some(color) = parse_hex_rgb(&r.color) else {
            return;
        };
        let (w, h, corner, local) = self.badge_frame(r);
        let path = pill_path(w, h, corner);

        self.ctx.set_transform(affine_to_cpu(view * local));
        if r.use_gradient {
            let (pw, ph) = (w.ceil().max(1.0) as u32, h.ceil().max(1.0) as u32);
            let Ok(paint) =
                horizontal_fade_image(color, r.gradient_fade_percent / 100.0, pw, ph)
            else {
                return;
            };
            self.ctx.set_paint(paint);
        } else {
            self.ctx.set_paint(solid_paint(color, 1.0));
        }
        self.ctx.fill_path(&path);
        self.batch_dirty = true;
    }

    fn ribbon_badge_border(&mut self, r: &RibbonLayer, view: Affine) {
        if r.border_width <= 0.0 {
            return;
        }
        let Some(color) = parse_hex_rgb(&r.border_color) else {
            return;
        };
        let (w, h, corner, local) = self.badge_frame(r);
        let path = pill_path(w, h, corner);

        self.ctx.set_transform(affine_to_cpu(view * local));
        self.ctx
            .set_stroke(vello_cpu::kurbo::Stroke::new(r.border_width));
        self.ctx.set_paint(solid_paint(color, 1.0));
        self.ctx.stroke_path(&path);
        self.batch_dirty = true;
    }

    fn paint_text(&mut self, t: &TextLayer, opacity: f64, view: Affine) {
        let content = t.text_case.apply(&t.content);
        if content.is_empty() {
            return;
        }
        let fill = parse_hex_rgb(&t.color);
        let stroke = parse_hex_rgb(&t.stroke_color);
        if fill.is_none() && (stroke.is_none() || t.stroke_width <= 0.0) {
            return;
        }

        let chars: Vec<char> = content.chars().collect();
        let shaped: Vec<ShapedText> = chars
            .iter()
            .map(|&c| {
                self.text_engine
                    .shape_char(c, &t.font_family, t.font_size as f32)
            })
            .collect();
        if shaped.iter().all(ShapedText::is_empty) {
            return;
        }

        let pushed_opacity = opacity < 1.0;
        if pushed_opacity {
            self.ctx.push_opacity_layer(opacity as f32);
        }

        let center = self.size.center();
        match t.ribbon_style {
            RibbonStyle::Arc => {
                let radius = t.ribbon_radius - t.radial_offset;
                let widths: Vec<f64> =
                    shaped.iter().map(|s| s.width + t.letter_spacing).collect();
                let slots = arc_glyph_slots(&widths, radius, t.start_angle, t.arc_width);
                for (slot, s) in slots.iter().zip(&shaped) {
                    if s.is_empty() {
                        continue;
                    }
                    let local = Affine::translate((center.x, center.y))
                        * Affine::rotate(slot.rotation)
                        * Affine::translate((0.0, -radius))
                        * Affine::translate((-s.width / 2.0, -s.height / 2.0));
                    self.draw_shaped(s, view * local, fill, stroke, t.stroke_width);
                }
            }
            RibbonStyle::Badge => {
                let widths: Vec<f64> = shaped.iter().map(|s| s.width).collect();
                let centers = straight_glyph_centers(&widths, t.letter_spacing);
                let base = Affine::translate((center.x, center.y + t.badge_offset_y))
                    * Affine::rotate(deg_to_rad(t.badge_rotation));
                for (cx, s) in centers.iter().zip(&shaped) {
                    if s.is_empty() {
                        continue;
                    }
                    let local =
                        base * Affine::translate((cx - s.width / 2.0, -s.height / 2.0));
                    self.draw_shaped(s, view * local, fill, stroke, t.stroke_width);
                }
            }
        }

        if pushed_opacity {
            self.ctx.pop_layer();
        }
    }

    /// Draw one shaped fragment at `transform`: outline stroke first (at
    /// twice the configured width, so the visible rim is the configured
    /// width after the fill covers the inner half), then the fill.
    fn draw_shaped(
        &mut self,
        s: &ShapedText,
        transform: Affine,
        fill: Option<Rgba8>,
        stroke: Option<Rgba8>,
        stroke_width: f64,
    ) {
        self.ctx.set_transform(affine_to_cpu(transform));
        for run in &s.runs {
            if stroke_width > 0.0
                && let Some(sc) = stroke
            {
                self.ctx
                    .set_stroke(vello_cpu::kurbo::Stroke::new(stroke_width * 2.0));
                self.ctx.set_paint(solid_paint(sc, 1.0));
                self.ctx
                    .glyph_run(&run.font)
                    .font_size(run.font_size)
                    .stroke_glyphs(run.glyphs.iter().copied());
            }
            if let Some(fc) = fill {
                self.ctx.set_paint(solid_paint(fc, 1.0));
                self.ctx
                    .glyph_run(&run.font)
                    .font_size(run.font_size)
                    .fill_glyphs(run.glyphs.iter().copied());
            }
            self.batch_dirty = true;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
