#[macro_use]
extern crate tracing;

use dotflip_common::{
    Address, ArchivedPixelBitmap, BasicFont, Display, Geometry, Pages, WrapPolicy,
    message::Messages,
};
use rkyv::vec::ArchivedVec;
use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const DEFAULT_PORT: &str = "/dev/ttyAMA0";
const GREETING: &str = "Initializing display...";

#[derive(argh::FromArgs)]
/// Show text on a Hanover flip-dot panel
struct Args {
    #[argh(option, default = "PathBuf::from(DEFAULT_PORT)")]
    /// serial device the panel is attached to (already set to 4800 8N1 raw)
    port: PathBuf,

    #[argh(option, default = "1")]
    /// bus address of the panel, 0-9
    address: u8,

    #[argh(option, default = "16")]
    /// panel height in pixels
    rows: usize,

    #[argh(option, default = "96")]
    /// panel width in pixels
    cols: usize,

    #[argh(option, default = "2000")]
    /// time each page stays up, in milliseconds
    delay_ms: u64,

    #[argh(option)]
    /// characters handed to a single page (defaults to one per cell)
    capacity: Option<usize>,

    #[argh(switch)]
    /// keep a spare cell at the end of each row when wrapping words
    legacy_wrap: bool,

    #[argh(option, default = "String::from(GREETING)")]
    /// text shown right after start-up, empty to skip
    greeting: String,

    #[argh(option)]
    /// stream of length-prefixed messages to show, `-` for stdin
    messages: Option<PathBuf>,

    #[argh(option)]
    /// archive of pre-rendered pages produced by dotflip-process
    data: Option<PathBuf>,

    #[argh(switch)]
    /// skip validating the page archive
    ///
    /// will speed up initial loads at the cost of potential segfaults
    skip_checks: bool,

    #[argh(positional)]
    /// messages to show before reading the stream
    text: Vec<String>,
}

struct Player {
    display: Display,
    delay: Duration,
    policy: WrapPolicy,
    capacity: usize,
}

impl Player {
    fn hold(&self) {
        thread::sleep(self.delay);
    }

    fn play_message(&mut self, message: &str) -> anyhow::Result<()> {
        let geometry = self.display.geometry();
        let pages = Pages::new(message, geometry, &BasicFont)
            .policy(self.policy)
            .capacity(self.capacity);

        for page in pages {
            let page = page?;
            info!(text = page.text, "showing page");

            if let Err(error) = self.display.show(&page.bitmap) {
                error!(?error, "failed writing to display");
            }

            self.hold();
        }

        Ok(())
    }

    fn play_archive(&mut self, path: &Path, skip_checks: bool) -> anyhow::Result<()> {
        info!(path = %path.display(), "loading pages..");
        let data_file = File::open(path)?;
        let data = unsafe { memmap2::Mmap::map(&data_file)? };

        let pages: &ArchivedVec<ArchivedPixelBitmap> = if skip_checks {
            unsafe { rkyv::access_unchecked(&data) }
        } else {
            rkyv::access::<_, rkyv::rancor::Error>(&data)?
        };

        info!(pages = pages.len(), "loaded pages successfully");

        for (idx, page) in pages.iter().enumerate() {
            info!("showing archived page {idx}");

            if let Err(error) = self
                .display
                .show_raw(page.as_bytes(), page.rows(), page.cols())
            {
                error!(?error, "failed writing to display");
            }

            self.hold();
        }

        Ok(())
    }
}

fn open_stream(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdin().lock()));
    }

    Ok(Box::new(File::open(path)?))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();

    let geometry = Geometry::new(args.rows, args.cols)?;
    let address = Address::new(args.address)?;
    let policy = if args.legacy_wrap {
        WrapPolicy::KeepSpare
    } else {
        WrapPolicy::Exact
    };

    let display = Display::open(&args.port, address, geometry)?;
    let mut player = Player {
        display,
        delay: Duration::from_millis(args.delay_ms),
        policy,
        capacity: args.capacity.unwrap_or(geometry.cells()),
    };

    if !args.greeting.is_empty() {
        player.play_message(&args.greeting)?;
    }

    if let Some(path) = &args.data {
        player.play_archive(path, args.skip_checks)?;
    }

    for text in &args.text {
        player.play_message(text)?;
    }

    if let Some(path) = &args.messages {
        let stream = BufReader::new(open_stream(path)?);
        for message in Messages::new(stream) {
            let message = message?;
            info!(len = message.len(), "received message");
            player.play_message(&message)?;
        }
    }

    player.display.close()?;

    Ok(())
}
