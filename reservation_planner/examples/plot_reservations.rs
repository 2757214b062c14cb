use std::sync::Arc;

use plotters::prelude::*;

use reservation_planner::point::{point2, vec2};
use reservation_planner::{LinearHardwareProfile, OrientedPoint, ReservationMapBuilder, TimedRectangle, Tray};

const SCALE: f32 = 60.0;

fn to_pixel(x: f32, y: f32, height: f32) -> (i32, i32) {
    ((x * SCALE) as i32, ((height - y) * SCALE) as i32)
}

fn polygon(rect: &TimedRectangle, height: f32, inflated: bool) -> Vec<(i32, i32)> {
    let corners = if inflated {
        rect.points_inflated()
    } else {
        rect.points_non_inflated()
    };
    corners.iter().map(|p| to_pixel(p.x, p.y, height)).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (width, height) = (12.0, 8.0);
    let map = ReservationMapBuilder::new()
        .with_size(width, height)
        .with_robot_radius(0.3)
        .with_grid_resolution(0.5)
        .with_max_adjacency_distance(0.75)
        .add_box(point2(4.0, 4.0), vec2(1.0, 5.0), 0.0)
        .add_box(point2(8.0, 3.0), vec2(4.0, 1.0), 0.4)
        .with_hardware_profile(Arc::new(LinearHardwareProfile::new(1.0, 2.0).with_consumption(0.05, 0.01)))
        .build()?;

    let charger = Tray::new(1, 11.0, 6.0, 0.0);

    let first = map.get_path(OrientedPoint::new(1.0, 1.0, 0.0), charger, 0.0, 10.0, 1)?;
    map.add_reservations(first.generate_reservations(1));

    let second = map.get_path(OrientedPoint::new(11.0, 1.0, 3.14), OrientedPoint::new(1.0, 7.0, 0.0), 0.0, 0.0, 2)?;
    map.add_reservations(second.generate_reservations(2));

    for (agent, path) in [(1, &first), (2, &second)] {
        println!(
            "agent {}: {} nodes, {:.2} m, {:.2} s, arrives at {:.2}, battery {:.3}",
            agent,
            path.nodes().len(),
            path.distance(),
            path.duration(),
            path.arrival_time(),
            path.battery_consumption(),
        );
    }

    let now = 4.0;
    let root = BitMapBackend::new("reservations.png", ((width * SCALE) as u32, (height * SCALE) as u32))
        .into_drawing_area();
    root.fill(&WHITE)?;

    for obstacle in map.obstacles() {
        root.draw(&Polygon::new(polygon(&obstacle, height, true), RGBColor(240, 200, 200).filled()))?;
        root.draw(&Polygon::new(polygon(&obstacle, height, false), RGBColor(200, 50, 50).filled()))?;
    }

    for reservation in map.inactive_reservations(now) {
        root.draw(&Polygon::new(polygon(&reservation, height, false), BLUE.mix(0.1).filled()))?;
    }
    for reservation in map.active_reservations(now) {
        root.draw(&Polygon::new(polygon(&reservation, height, false), BLUE.mix(0.4).filled()))?;
    }

    for (path, color) in [(&first, GREEN), (&second, MAGENTA)] {
        let series: Vec<_> = path.nodes().iter().map(|p| to_pixel(p.x, p.y, height)).collect();
        root.draw(&PathElement::new(series.clone(), ShapeStyle::from(&color).stroke_width(3)))?;
        for coord in series {
            root.draw(&Circle::new(coord, 4, ShapeStyle::from(&color).filled()))?;
        }
    }

    root.present()?;
    eprintln!("wrote reservations.png");

    Ok(())
}
