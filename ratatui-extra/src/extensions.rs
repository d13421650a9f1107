use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Widget},
};

use crate::thematize::Thematize;

pub trait ThemedWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &impl Thematize);
}

pub trait BorderedWidget<A> {
    fn render_with_block(
        &self,
        area: Rect,
        buf: &mut Buffer,
        block: Block<'_>,
        leave_horizontal_space: bool,
        args: A,
    ) where
        Self: Sized;
}

impl<T: ThemedWidget, Theme: Thematize> BorderedWidget<&Theme> for T {
    fn render_with_block(
        &self,
        area: Rect,
        buf: &mut Buffer,
        block: Block<'_>,
        leave_horizontal_space: bool,
        theme: &Theme,
    ) where
        Self: Sized,
    {
        let inner_area = block
            .inner(area)
            .margin_h(if leave_horizontal_space { 1 } else { 0 });
        block.render(area, buf);
        self.render(inner_area, buf, theme);
    }
}

pub trait RectExt {
    fn change_height(self, new_height: u16) -> Rect;

    fn margin_h(self, m: u16) -> Rect;

    fn margin_top(self, m: u16) -> Rect;
}

impl RectExt for Rect {
    fn change_height(self, new_height: u16) -> Rect {
        Rect {
            height: new_height.min(self.height),
            ..self
        }
    }

    fn margin_h(self, m: u16) -> Rect {
        let m = m.min(self.width / 2);
        Rect {
            x: self.x + m,
            width: self.width - 2 * m,
            ..self
        }
    }

    fn margin_top(self, m: u16) -> Rect {
        let m = m.min(self.height);
        Rect {
            y: self.y + m,
            height: self.height - m,
            ..self
        }
    }
}
