use pixup::{Attachment, UploadClient, UploadTarget};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(base_url)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: upload_demo <image-file> <base-url>");
    };

    let bytes = std::fs::read(&path)?;
    let name = std::path::Path::new(&path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.bin")
        .to_string();

    let target = UploadTarget::image(base_url, "upload/logo");

    let mut attachment = Attachment::default();
    attachment.select(name, bytes, &target)?;

    let client = UploadClient::new();
    match attachment.confirm(&client, &target)? {
        Some(url) => println!("{url}"),
        None => eprintln!("an upload was already in flight"),
    }

    Ok(())
}
