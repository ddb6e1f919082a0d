//! Adjust one rectangle on an image file.
//!
//! ```text
//! cargo run -p crop-adjust --example fix_rect -- page.jpg 190 125 172 31
//! ```

use std::env;

use crop_adjust::core::init_with_level;
use crop_adjust::process::load_grid;
use crop_adjust::{CropAdjustParams, CropAdjuster, Rect};
use log::{info, LevelFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_with_level(LevelFilter::Debug)?;

    let args: Vec<String> = env::args().skip(1).collect();
    let [path, x, y, w, h] = args.as_slice() else {
        return Err("usage: fix_rect <image> <x> <y> <w> <h>".into());
    };
    let rect = Rect::new(x.parse()?, y.parse()?, w.parse()?, h.parse()?);

    let grid = load_grid(path)?;
    info!("loaded {}x{} grid", grid.width(), grid.height());

    let adjuster = CropAdjuster::new(CropAdjustParams::default())?;
    let fixed = adjuster.fix_rect(&grid, rect)?;
    println!("Adjusted rectangle: {fixed}");
    Ok(())
}
