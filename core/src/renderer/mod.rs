mod text;

pub use text::TextEngine;

use std::mem;

use tiny_skia::{
    PixmapMut, PathBuilder, FillRule, Transform,
    Paint, Mask, Stroke
};

use crate::{
    color::Color,
    draw::{BorderRadius, Circle, LineHeight, Quad, Surface, TextInfo},
    geometry::{Point, Rect},
    theme::Font
};

/// Software rendering surface: records draw commands and rasterizes
/// them into a `tiny_skia` pixmap in one pass.
pub struct Renderer {
    text: TextEngine,
    mask: Mask,
    commands: Vec<Command>
}

#[derive(Debug)]
enum Command {
    Draw(Primitive),
    Clip(Rect),
    PopClip
}

#[derive(Debug)]
enum Primitive {
    Quad {
        rect: Rect,
        background: Color,
        border_radius: BorderRadius,
        border_width: f32,
        border_color: Color
    },
    Circle {
        pos: Point,
        radius: f32,
        background: Color,
        border_width: f32,
        border_color: Color
    },
    Text {
        text: String,
        size: f32,
        line_height: LineHeight,
        font: Font,
        rect: Rect,
        color: Color
    }
}

impl Renderer {
    pub fn new(text: TextEngine) -> Self {
        Self {
            text,
            mask: Mask::new(1, 1).expect("non-zero mask size"),
            commands: Vec::with_capacity(64)
        }
    }

    pub fn render(&mut self, pixmap: &mut PixmapMut) {
        if self.mask.width() != pixmap.width() ||
            self.mask.height() != pixmap.height()
        {
            self.mask = Mask::new(pixmap.width(), pixmap.height())
                .expect("non-zero mask size");
        }

        let mut clip_stack: Vec<Rect> = Vec::with_capacity(8);
        let mut has_clip = false;
        let mut builder = PathBuilder::new();

        let mut commands = mem::take(&mut self.commands);
        for command in commands.drain(..) {
            match command {
                Command::Draw(primitive) => {
                    let mask = has_clip.then_some(&self.mask);

                    match primitive {
                        Primitive::Quad {
                            rect,
                            background,
                            border_radius,
                            border_width,
                            border_color
                        } => {
                            let radius = border_radius.0;

                            if radius.iter().sum::<f32>() > 0f32 {
                                rounded_rect(&mut builder, rect, radius);
                            } else if let Some(rect) = to_skia(rect) {
                                builder.push_rect(rect);
                            }

                            let Some(path) = mem::take(&mut builder).finish() else {
                                continue;
                            };

                            let mut paint = Paint::default();
                            paint.anti_alias = true;
                            paint.set_color(background.into());

                            if background != Color::TRANSPARENT {
                                pixmap.fill_path(
                                    &path,
                                    &paint,
                                    FillRule::EvenOdd,
                                    Transform::identity(),
                                    mask
                                );
                            }

                            if border_width > 0f32 {
                                paint.set_color(border_color.into());

                                let mut stroke = Stroke::default();
                                stroke.width = border_width;

                                pixmap.stroke_path(
                                    &path,
                                    &paint,
                                    &stroke,
                                    Transform::identity(),
                                    mask
                                );
                            }

                            builder = path.clear();
                        }
                        Primitive::Circle {
                            pos,
                            radius,
                            background,
                            border_width,
                            border_color
                        } => {
                            builder.push_circle(pos.x, pos.y, radius);

                            let Some(path) = mem::take(&mut builder).finish() else {
                                continue;
                            };

                            let mut paint = Paint::default();
                            paint.anti_alias = true;
                            paint.set_color(background.into());

                            pixmap.fill_path(
                                &path,
                                &paint,
                                FillRule::EvenOdd,
                                Transform::identity(),
                                mask
                            );

                            if border_width > 0f32 {
                                paint.set_color(border_color.into());

                                let mut stroke = Stroke::default();
                                stroke.width = border_width;

                                pixmap.stroke_path(
                                    &path,
                                    &paint,
                                    &stroke,
                                    Transform::identity(),
                                    mask
                                );
                            }

                            builder = path.clear();
                        }
                        Primitive::Text {
                            text,
                            size,
                            line_height,
                            font,
                            rect,
                            color
                        } => {
                            let info = TextInfo {
                                text: &text,
                                size,
                                line_height,
                                font
                            };

                            self.text.draw(pixmap, mask, &info, rect, color);
                        }
                    }
                }
                Command::Clip(rect) => {
                    clip_stack.push(rect);
                    has_clip = true;

                    builder = self.fill_clip_mask(builder, rect);
                }
                Command::PopClip => {
                    clip_stack.pop();
                    has_clip = !clip_stack.is_empty();

                    if let Some(clip) = clip_stack.last().copied() {
                        builder = self.fill_clip_mask(builder, clip);
                    }
                }
            }
        }

        // Assign back the buffer in order to reuse the memory.
        self.commands = commands;
    }

    fn fill_clip_mask(&mut self, mut builder: PathBuilder, clip: Rect) -> PathBuilder {
        self.mask.clear();

        let Some(rect) = to_skia(clip) else {
            return builder;
        };

        builder.push_rect(rect);
        let Some(path) = mem::take(&mut builder).finish() else {
            return PathBuilder::new();
        };

        self.mask.fill_path(
            &path,
            FillRule::EvenOdd,
            false,
            Transform::identity()
        );

        path.clear()
    }
}

impl Surface for Renderer {
    #[inline]
    fn fill_quad(&mut self, quad: Quad) {
        self.commands.push(
            Command::Draw(Primitive::Quad {
                rect: quad.rect,
                background: quad.style.background,
                border_radius: quad.style.border_radius,
                border_width: quad.style.border_width,
                border_color: quad.style.border_color
            })
        );
    }

    #[inline]
    fn fill_circle(&mut self, circle: Circle) {
        self.commands.push(
            Command::Draw(Primitive::Circle {
                pos: circle.pos,
                radius: circle.radius,
                background: circle.background,
                border_width: circle.border_width,
                border_color: circle.border_color
            })
        );
    }

    #[inline]
    fn fill_text(&mut self, info: &TextInfo, rect: Rect, color: Color) {
        self.commands.push(
            Command::Draw(Primitive::Text {
                text: info.text.to_owned(),
                size: info.size,
                line_height: info.line_height,
                font: info.font,
                rect,
                color
            })
        );
    }

    #[inline]
    fn push_clip(&mut self, clip: Rect) {
        self.commands.push(Command::Clip(clip));
    }

    #[inline]
    fn pop_clip(&mut self) {
        self.commands.push(Command::PopClip);
    }
}

#[inline]
fn to_skia(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

fn rounded_rect(builder: &mut PathBuilder, rect: Rect, radius: [f32; 4]) {
    let [tl, tr, br, bl] = radius;

    builder.move_to(rect.x, rect.y + tl);
    builder.quad_to(rect.x, rect.y, rect.x + tl, rect.y);

    builder.line_to(rect.x + rect.width - tr, rect.y);
    builder.quad_to(
        rect.x + rect.width,
        rect.y,
        rect.x + rect.width,
        rect.y + tr
    );

    builder.line_to(rect.x + rect.width, rect.y + rect.height - br);
    builder.quad_to(
        rect.x + rect.width,
        rect.y + rect.height,
        rect.x + rect.width - br,
        rect.y + rect.height
    );

    builder.line_to(rect.x + bl, rect.y + rect.height);
    builder.quad_to(
        rect.x,
        rect.y + rect.height,
        rect.x,
        rect.y + rect.height - bl
    );

    builder.close();
}
