//! Tagged unions: one schema per `type`.
//!
//! Run with: cargo run --example shapes

use formtree::prelude::*;
use formtree::{value, Log, Path};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let circle = RecordFormat::builder()
        .required("type", TextFormat::new())
        .required("radius", NumberFormat::new().is_positive())
        .build()?;
    let square = RecordFormat::builder()
        .required("type", TextFormat::new())
        .required("side", NumberFormat::new().is_positive())
        .build()?;
    let shape = VariantFormat::tagged("type")
        .add("circle", circle)
        .add("square", square)
        .build()?;
    let drawing = RecordFormat::builder()
        .required("shapes", SequenceFormat::of(shape).max_items(10))
        .build()?;

    let input = value!({
        "shapes": [
            { "type": "circle", "radius": "1.50" },
            { "type": "circle", "radius": (-1) },
            { "type": "hexagon" },
            { "side": 2 }
        ]
    });

    let mut log = Log::new();
    match drawing.extract(&input, &mut log, &Path::Prefix("drawing")) {
        Some(out) => println!("accepted: {}", out),
        None => {
            for entry in log.entries() {
                println!("{:<20} {}", entry.path, entry.message);
            }
        }
    }

    // a cheap probe never formats a message
    let ok = drawing.check(&value!({ "shapes": [{ "type": "square", "side": "3" }] }));
    println!("second drawing valid: {}", ok);

    Ok(())
}
