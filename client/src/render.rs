use web_sys::CanvasRenderingContext2d;

use syncboard_shared::{Line, Point};

use crate::state::ViewState;

/// The subset of the 2D canvas API the board draws with.
pub trait Surface {
    fn clear(&self, width: f64, height: f64);
    fn save(&self);
    fn restore(&self);
    fn translate(&self, x: f64, y: f64);
    fn set_stroke_color(&self, color: &str);
    fn set_fill_color(&self, color: &str);
    fn set_line_width(&self, width: f64);
    fn begin_path(&self);
    fn move_to(&self, x: f64, y: f64);
    fn line_to(&self, x: f64, y: f64);
    fn stroke(&self);
    fn fill_circle(&self, x: f64, y: f64, radius: f64);
}

impl Surface for CanvasRenderingContext2d {
    fn clear(&self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn save(&self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn translate(&self, x: f64, y: f64) {
        let _ = CanvasRenderingContext2d::translate(self, x, y);
    }

    fn set_stroke_color(&self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_fill_color(&self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_line_width(&self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn begin_path(&self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn stroke(&self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_circle(&self, x: f64, y: f64, radius: f64) {
        CanvasRenderingContext2d::begin_path(self);
        let _ = self.arc(x, y, radius, 0.0, std::f64::consts::PI * 2.0);
        self.fill();
    }
}

pub fn draw_dot(surface: &impl Surface, point: Point, color: &str, width: f64) {
    surface.set_fill_color(color);
    surface.fill_circle(point.x, point.y, width / 2.0);
}

pub fn draw_line(surface: &impl Surface, line: &Line) {
    let width = f64::from(line.line_width);
    match line.points.as_slice() {
        [] => {}
        [point] => draw_dot(surface, *point, &line.color, width),
        [first, rest @ ..] => {
            surface.set_stroke_color(&line.color);
            surface.set_line_width(width);
            surface.begin_path();
            surface.move_to(first.x, first.y);
            for point in rest {
                surface.line_to(point.x, point.y);
            }
            surface.stroke();
        }
    }
}

pub fn redraw(surface: &impl Surface, lines: &[Line], view: ViewState, width: f64, height: f64) {
    surface.clear(width, height);
    surface.save();
    surface.translate(view.translate_x, view.translate_y);
    for line in lines {
        draw_line(surface, line);
    }
    surface.restore();
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
