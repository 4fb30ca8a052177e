#[macro_use]
extern crate tracing;

use dotflip_common::{BasicFont, Geometry, Pages, PixelBitmap, WrapPolicy};
use itertools::Itertools;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(argh::FromArgs)]
/// render text and images into a page archive to be played by dotflip
struct Args {
    #[argh(option)]
    /// text file with one message per line
    text: Option<PathBuf>,

    #[argh(option)]
    /// path to a directory with image files, shown in file name order
    images: Option<PathBuf>,

    #[argh(option)]
    /// path to output file
    output: PathBuf,

    #[argh(option, default = "16")]
    /// panel height in pixels
    rows: usize,

    #[argh(option, default = "96")]
    /// panel width in pixels
    cols: usize,

    #[argh(option, default = "128")]
    /// minimum luma of a lit dot
    threshold: u8,

    #[argh(option)]
    /// characters handed to a single page (defaults to one per cell)
    capacity: Option<usize>,

    #[argh(switch)]
    /// keep a spare cell at the end of each row when wrapping words
    legacy_wrap: bool,
}

/// Map an image onto the panel, dot on where the luma reaches `threshold`.
///
/// Parts of the image beyond the panel are cut off, missing parts stay dark.
fn read_image(geometry: Geometry, threshold: u8, entry_path: &Path) -> anyhow::Result<PixelBitmap> {
    let image = image::open(entry_path)?.to_luma8();
    let mut bitmap = PixelBitmap::new(geometry)?;

    for (x, y, pixel) in image.enumerate_pixels() {
        let (row, col) = (y as usize, x as usize);
        if row < geometry.rows() && col < geometry.cols() {
            bitmap.set(row, col, pixel.0[0] >= threshold);
        }
    }

    Ok(bitmap)
}

fn render_text(
    geometry: Geometry,
    policy: WrapPolicy,
    capacity: usize,
    path: &Path,
) -> anyhow::Result<Vec<PixelBitmap>> {
    let contents = fs::read_to_string(path)?;
    let mut pages = Vec::new();

    for message in contents.lines().filter(|line| !line.trim().is_empty()) {
        for page in Pages::new(message, geometry, &BasicFont)
            .policy(policy)
            .capacity(capacity)
        {
            let page = page?;
            info!(text = page.text, "rendered page");
            pages.push(page.bitmap);
        }
    }

    Ok(pages)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();

    if args.text.is_none() && args.images.is_none() {
        anyhow::bail!("nothing to render, pass --text and/or --images");
    }

    let geometry = Geometry::new(args.rows, args.cols)?;
    let policy = if args.legacy_wrap {
        WrapPolicy::KeepSpare
    } else {
        WrapPolicy::Exact
    };

    let mut pages = Vec::new();

    if let Some(path) = &args.text {
        let capacity = args.capacity.unwrap_or(geometry.cells());
        pages.extend(render_text(geometry, policy, capacity, path)?);
    }

    if let Some(path) = &args.images {
        let files: Vec<PathBuf> = fs::read_dir(path)?
            .map_ok(|entry| entry.path())
            .try_collect()?;

        for entry in files.into_iter().sorted() {
            info!(path = %entry.display(), "thresholding image");
            pages.push(read_image(geometry, args.threshold, &entry)?);
        }
    }

    info!(pages = pages.len(), "writing archive");

    let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&pages)?;
    let file = File::create(args.output)?;
    let mut file = BufWriter::new(file);
    file.write_all(&bytes)?;
    file.flush()?;

    Ok(())
}
