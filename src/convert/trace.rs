//! Mask-pixel to polygon conversion.
//!
//! Connected mask regions (4-connectivity) become rectilinear polygons.
//! Each region's outer contour is walked corner-by-corner with the mask
//! kept on the left of the travel direction, which yields the ring
//! orientation the rule checks expect: first vertex at the region's
//! bottom-left pixel corner, bottom edge traversed in +x. A vertex is
//! emitted at every direction change.

use crate::check::geometry::{Point, Polygon};

use super::pgm::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Right,
    Up,
    Left,
    Down,
}

impl Direction {
    fn step(self, x: i64, y: i64) -> (i64, i64) {
        match self {
            Direction::Right => (x + 1, y),
            Direction::Up => (x, y + 1),
            Direction::Left => (x - 1, y),
            Direction::Down => (x, y - 1),
        }
    }

    fn turned_left(self) -> Direction {
        match self {
            Direction::Right => Direction::Up,
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
        }
    }

    fn turned_right(self) -> Direction {
        match self {
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
        }
    }

    /// Pixels adjacent to the lattice edge about to be walked from
    /// corner (x, y): (left-of-travel, right-of-travel).
    fn flanking_pixels(self, x: i64, y: i64) -> ((i64, i64), (i64, i64)) {
        match self {
            Direction::Right => ((x, y), (x, y - 1)),
            Direction::Up => ((x - 1, y), (x, y)),
            Direction::Left => ((x - 1, y - 1), (x - 1, y)),
            Direction::Down => ((x, y - 1), (x - 1, y - 1)),
        }
    }
}

/// Extract all mask-region polygons from an image, ids in discovery
/// order (bottom-up, left-to-right scan).
pub fn polygons_from_image(image: &Image) -> Vec<Polygon> {
    let width = image.width;
    let height = image.height;
    let mut labeled = vec![false; width * height];
    let mut polygons = Vec::new();
    let mut next_id = 0;

    for y in 0..height {
        for x in 0..width {
            if !image.is_mask_pixel(x as i64, y as i64) || labeled[y * width + x] {
                continue;
            }
            let component = collect_component(image, x, y, &mut labeled);
            let ring = trace_contour(&component, x as i64, y as i64, width, height);
            if ring.len() >= 4 {
                polygons.push(Polygon::from_vertices(next_id, ring));
                next_id += 1;
            }
        }
    }

    polygons
}

/// Flood-fill the 4-connected component containing (x0, y0), marking it
/// in `labeled`, and return its membership set as a bitmap.
fn collect_component(image: &Image, x0: usize, y0: usize, labeled: &mut [bool]) -> Vec<bool> {
    let width = image.width;
    let height = image.height;
    let mut member = vec![false; width * height];
    let mut stack = vec![(x0, y0)];
    member[y0 * width + x0] = true;
    labeled[y0 * width + x0] = true;

    while let Some((x, y)) = stack.pop() {
        let neighbours = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbours {
            if nx >= width || ny >= height {
                continue;
            }
            let idx = ny * width + nx;
            if member[idx] || !image.is_mask_pixel(nx as i64, ny as i64) {
                continue;
            }
            member[idx] = true;
            labeled[idx] = true;
            stack.push((nx, ny));
        }
    }

    member
}

/// Walk the outer contour of a component starting at the bottom-left
/// corner of its bottom-left pixel, mask on the left of travel.
fn trace_contour(
    member: &[bool],
    start_x: i64,
    start_y: i64,
    width: usize,
    height: usize,
) -> Vec<Point> {
    let inside = |x: i64, y: i64| -> bool {
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return false;
        }
        member[y as usize * width + x as usize]
    };

    let start = (start_x, start_y);
    let mut corner = start;
    let mut dir = Direction::Right;
    let mut ring = vec![Point::new(start_x as i32, start_y as i32)];

    // Any rectilinear contour closes well within this many steps.
    let max_steps = 4 * width * height + 8;
    for _ in 0..max_steps {
        let (left, right) = dir.flanking_pixels(corner.0, corner.1);
        let new_dir = if !inside(left.0, left.1) {
            dir.turned_left()
        } else if inside(right.0, right.1) {
            dir.turned_right()
        } else {
            dir
        };
        if new_dir != dir && corner != start {
            ring.push(Point::new(corner.0 as i32, corner.1 as i32));
        }
        dir = new_dir;
        corner = dir.step(corner.0, corner.1);
        if corner == start {
            break;
        }
    }

    ring
}
