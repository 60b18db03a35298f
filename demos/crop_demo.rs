use pixup::{render_crop, CropSession, DisplaySize, EncodeSettings, Handle, Point};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let img = sample_image(900);
    let natural = pixup::natural_size(&img);
    let mut session = CropSession::fitted(natural, DisplaySize::new(800.0, 600.0)?);

    // The gesture script a pointer would produce: grow from the bottom-right
    // corner, then drag the selection onto the disc.
    session.begin_resize(Handle::BottomRight);
    session.pointer_moved(Point::new(560.0, 560.0));
    session.finish();

    session.begin_drag();
    session.pointer_moved(Point::new(300.0, 300.0));
    session.finish();

    let jpeg = render_crop(
        &img,
        session.region(),
        session.display(),
        EncodeSettings::default(),
    )?;

    let out_dir = std::path::PathBuf::from("target");
    std::fs::create_dir_all(&out_dir)?;
    let out_path = out_dir.join("crop_demo.jpg");
    std::fs::write(&out_path, &jpeg)?;

    eprintln!("wrote {}", out_path.display());
    Ok(())
}

/// A gradient backdrop with a bright disc in the middle, so the crop has
/// something recognizable to land on.
fn sample_image(side: u32) -> image::DynamicImage {
    let center = f64::from(side) / 2.0;
    image::DynamicImage::ImageRgba8(image::RgbaImage::from_fn(side, side, |x, y| {
        let dx = f64::from(x) - center;
        let dy = f64::from(y) - center;
        if (dx * dx + dy * dy).sqrt() < center * 0.4 {
            image::Rgba([245, 208, 62, 255])
        } else {
            image::Rgba([(x / 4) as u8, (y / 4) as u8, 120, 255])
        }
    }))
}
