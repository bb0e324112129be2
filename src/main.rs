use clap::{Parser, Subcommand};
use disk_media_sync::config::{self, Config, Overrides};
use disk_media_sync::imaging::RustBackend;
use disk_media_sync::process::{ProcessConfig, process_and_upload};
use disk_media_sync::remote::YandexDisk;
use disk_media_sync::report::RunReport;
use disk_media_sync::video::{CodecPair, FfmpegTranscoder};
use disk_media_sync::{mirror, output};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "disk-media-sync")]
#[command(about = "Mirror a Yandex Disk folder, normalize its media, upload the photos back")]
#[command(long_about = "\
Mirror a Yandex Disk folder, normalize its media, upload the photos back

Every photo (jpg, jpeg, png) is oriented, fitted into 1080x1440 and saved
as JPEG under a per-folder staging directory:

  convert/
  ├── a.jpg
  ├── b.mov
  ├── b.mp4                        # transcoded next to its source
  ├── resize/
  │   └── sj_1.jpg                 # uploaded to disk:/<folder>/sj_1.jpg
  └── Bags/
      ├── c.png
      └── resize/
          └── sj_1.jpg             # uploaded to disk:/<folder>/Bags/sj_1.jpg

The OAuth token is read from API_KEY_YADISK (or a .env file).

Run 'disk-media-sync gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./disk-media-sync.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Remote folder, e.g. disk:/Photos
    #[arg(long, global = true)]
    remote: Option<String>,

    /// Local mirror directory
    #[arg(long, global = true)]
    local: Option<PathBuf>,

    /// Stop at the first failed file instead of recording it and moving on
    #[arg(long, global = true)]
    fail_fast: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: mirror → process → upload
    Sync,
    /// Download the remote folder into the local mirror
    Mirror,
    /// Process an existing local mirror and upload the results
    Process,
    /// Print a stock config file with all options documented
    GenConfig,
}

fn setup_logging(verbose: bool) {
    let default = if verbose {
        "disk_media_sync=debug,info"
    } else {
        "disk_media_sync=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (mirror_stage, process_stage) = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(ExitCode::SUCCESS);
        }
        Command::Sync => (true, true),
        Command::Mirror => (true, false),
        Command::Process => (false, true),
    };

    // .env may carry RUST_LOG as well as the token
    dotenvy::dotenv().ok();
    setup_logging(cli.verbose);

    let overrides = Overrides {
        remote_source: cli.remote,
        local_root: cli.local,
        fail_fast: cli.fail_fast,
    };
    let cwd = std::env::current_dir()?;
    let config = config::load_config(cli.config.as_deref(), &cwd, &overrides)?;
    let storage = build_storage(&config)?;

    let mut report = RunReport::new(config.run.fail_fast);
    let result = run(&storage, &config, mirror_stage, process_stage, &mut report);

    output::print_report(&report);
    result?;

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run(
    storage: &YandexDisk,
    config: &Config,
    mirror_stage: bool,
    process_stage: bool,
    report: &mut RunReport,
) -> disk_media_sync::error::Result<()> {
    if mirror_stage {
        mirror::mirror(storage, &config.remote.source, &config.local.root, report)?;
    }
    if process_stage {
        let transcoder = FfmpegTranscoder::new(
            &config.videos.ffmpeg,
            CodecPair {
                video: config.videos.video_codec.clone(),
                audio: config.videos.audio_codec.clone(),
            },
        );
        process_and_upload(
            storage,
            &transcoder,
            &RustBackend::new(),
            &config.local.root,
            &config.remote.source,
            &ProcessConfig::from_config(config),
            report,
        )?;
    }
    Ok(())
}

fn build_storage(config: &Config) -> Result<YandexDisk, Box<dyn std::error::Error>> {
    let token = config.token()?;
    let storage = YandexDisk::new(
        &token,
        &config.remote.api_url,
        config.remote.page_size,
        Duration::from_secs(config.remote.timeout_secs),
    )?;
    Ok(storage)
}
