//! Animated plant scene demo.
//!
//! Grows the flowering plant, advances the animation a few ticks, and
//! prints an ASCII rendering of the final frame.
//!
//! Run with: `cargo run --example plant_ascii`

use glam::Vec2;
use verdure_noise::Value3;
use verdure_render::{Config, DrawSurface, Scenery};
use verdure_scene::{Color, palette};

const COLUMNS: usize = 80;
const ROWS: usize = 40;

/// Draw surface that plots strokes into a character grid.
struct AsciiCanvas {
    scale_x: f32,
    scale_y: f32,
    cells: Vec<char>,
    lines: usize,
    polygons: usize,
}

impl AsciiCanvas {
    fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            scale_x: COLUMNS as f32 / viewport_width,
            scale_y: ROWS as f32 / viewport_height,
            cells: vec![' '; COLUMNS * ROWS],
            lines: 0,
            polygons: 0,
        }
    }

    fn clear(&mut self) {
        self.cells.fill(' ');
        self.lines = 0;
        self.polygons = 0;
    }

    fn stroke(&mut self, from: Vec2, to: Vec2, glyph: char) {
        let a = Vec2::new(from.x * self.scale_x, from.y * self.scale_y);
        let b = Vec2::new(to.x * self.scale_x, to.y * self.scale_y);

        let steps = (b - a).length().ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = a.lerp(b, i as f32 / steps as f32);
            let (col, row) = (p.x as isize, p.y as isize);
            if (0..COLUMNS as isize).contains(&col) && (0..ROWS as isize).contains(&row) {
                self.cells[row as usize * COLUMNS + col as usize] = glyph;
            }
        }
    }

    fn glyph_for(stroke: Color) -> char {
        if stroke == palette::TILE {
            '.'
        } else if stroke == palette::LEAF {
            '*'
        } else {
            '#'
        }
    }

    fn print(&self) {
        for row in 0..ROWS {
            let line: String = self.cells[row * COLUMNS..(row + 1) * COLUMNS]
                .iter()
                .collect();
            println!("{}", line);
        }
    }
}

impl DrawSurface for AsciiCanvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, _width: f32) {
        self.lines += 1;
        self.stroke(from, to, Self::glyph_for(color));
    }

    fn draw_polygon(
        &mut self,
        points: &[Vec2],
        stroke: Color,
        _fill: Option<Color>,
        _width: f32,
        _opacity: f32,
    ) {
        self.polygons += 1;
        let glyph = Self::glyph_for(stroke);
        for pair in points.windows(2) {
            self.stroke(pair[0], pair[1], glyph);
        }
    }
}

fn main() {
    println!("=== Verdure Plant Scene ===\n");

    let config = Config {
        iterations: 4,
        ..Config::default()
    };
    let (width, height) = (config.width, config.height);

    let mut scenery =
        Scenery::new(config, Value3::with_seed(5), 42).expect("plant grammar is well-formed");

    println!("Tree objects: {}", scenery.tree().len());

    // Let the animation settle for a moment before taking the frame.
    let mut canvas = AsciiCanvas::new(width, height);
    for tick in 0..60 {
        canvas.clear();
        scenery.frame(tick as f64 * 50.0, &mut canvas);
    }

    println!("Falling leaves: {}", scenery.fallen().len());
    println!(
        "Painted {} lines and {} polygons\n",
        canvas.lines, canvas.polygons
    );

    println!("=== Frame ({}x{}) ===\n", COLUMNS, ROWS);
    canvas.print();
}
