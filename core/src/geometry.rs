pub trait FloatExt {
    fn expand(&self) -> f32;
}

#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32
}

#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct Size {
    pub width: f32,
    pub height: f32
}

#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct Point {
    pub x: f32,
    pub y: f32
}

/// The box model every widget carries: outer position and size plus
/// uniform margin and padding insets. Hit-testing and background/border
/// drawing both use the padding box.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub padding: f32,
    explicit_width: Option<f32>,
    explicit_height: Option<f32>
}

impl Size {
    pub const ZERO: Size = Size::new(0f32, 0f32);

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }

    /// Returns a new `Size` with `width` and `height` rounded
    /// away from zero to the nearest integer, unless they are
    /// already an integer.
    #[inline]
    pub fn expand(self) -> Size {
        Size::new(self.width.expand(), self.height.expand())
    }

    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        let width = self.width.clamp(min.width, max.width);
        let height = self.height.clamp(min.height, max.height);

        Self { width, height }
    }
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x &&
            point.x < self.x + self.width &&
            point.y >= self.y &&
            point.y < self.y + self.height
    }

    #[must_use]
    #[inline]
    pub fn translate(&self, amount: Size) -> Rect {
        Self {
            x: self.x + amount.width,
            y: self.y + amount.height,
            width: self.width,
            height: self.height
        }
    }

    #[must_use]
    #[inline]
    pub fn shrink(&self, amount: f32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: self.width - amount * 2f32,
            height: self.height - amount * 2f32
        }
    }
}

impl Point {
    pub const ZERO: Self = Self::new(0f32, 0f32);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Geometry {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Fixes `width` as explicitly supplied. Auto-sizing will no longer
    /// overwrite it.
    #[must_use]
    #[inline]
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self.explicit_width = Some(width);

        self
    }

    /// Fixes `height` as explicitly supplied. Auto-sizing will no longer
    /// overwrite it.
    #[must_use]
    #[inline]
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self.explicit_height = Some(height);

        self
    }

    #[must_use]
    #[inline]
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;

        self
    }

    #[must_use]
    #[inline]
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;

        self
    }

    #[inline]
    pub fn explicit_width(&self) -> Option<f32> {
        self.explicit_width
    }

    #[inline]
    pub fn explicit_height(&self) -> Option<f32> {
        self.explicit_height
    }

    /// The rectangle bounded by the widget's outer edge minus its margin.
    #[inline]
    pub fn padding_box(&self) -> Rect {
        Rect {
            x: self.x + self.margin,
            y: self.y + self.margin,
            width: self.width,
            height: self.height
        }
    }

    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.padding_box().contains(point)
    }

    /// Applies a computed minimal size, keeping any explicitly
    /// supplied dimension authoritative.
    #[inline]
    pub fn resize(&mut self, computed: Size) {
        self.width = self.explicit_width.unwrap_or(computed.width);
        self.height = self.explicit_height.unwrap_or(computed.height);
    }
}

impl FloatExt for f32 {
    #[inline]
    fn expand(&self) -> f32 {
        self.abs().ceil().copysign(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_box_is_offset_by_margin() {
        let mut geometry = Geometry::new(10f32, 20f32).with_margin(4f32);
        geometry.width = 100f32;
        geometry.height = 30f32;

        let rect = geometry.padding_box();
        assert_eq!(rect, Rect::new(14f32, 24f32, 100f32, 30f32));

        assert!(geometry.contains(Point::new(14f32, 24f32)));
        assert!(geometry.contains(Point::new(113f32, 53f32)));
        assert!(!geometry.contains(Point::new(10f32, 20f32)));
        assert!(!geometry.contains(Point::new(114f32, 24f32)));
    }

    #[test]
    fn resize_respects_explicit_dimensions() {
        let mut geometry = Geometry::new(0f32, 0f32).with_width(120f32);
        geometry.resize(Size::new(48f32, 22f32));

        assert_eq!(geometry.width, 120f32);
        assert_eq!(geometry.height, 22f32);

        let mut free = Geometry::new(0f32, 0f32);
        free.resize(Size::new(48f32, 22f32));

        assert_eq!(free.width, 48f32);
        assert_eq!(free.height, 22f32);
    }
}
