//! `killcam videos`: show the processed-video catalog.

use std::time::Duration;

use clap::Args;
use killcam_protocol::VideoRecord;
use killcam_uploader::{CatalogSummary, HttpTransport, download_url, fetch_videos};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct VideosArgs {
    /// Keep refreshing until nothing is processing (or Ctrl-C).
    #[clap(long)]
    pub watch: bool,
}

pub async fn run(args: VideosArgs, base_url: &str, poll_interval: Duration) -> anyhow::Result<()> {
    let transport = HttpTransport::new(base_url)?;

    if !args.watch {
        let videos = fetch_videos(&transport).await?;
        print!("{}", render_catalog(&videos, transport.base_url()));
        return Ok(());
    }

    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => match fetch_videos(&transport).await {
                Ok(videos) => {
                    print!("{}", render_catalog(&videos, transport.base_url()));
                    if watch_finished(&videos) {
                        info!("all videos settled, stopping watch");
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "catalog refresh failed"),
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

/// Watching ends once no video can change status any more.
fn watch_finished(videos: &[VideoRecord]) -> bool {
    CatalogSummary::of(videos).is_settled()
}

/// Catalog table followed by a status summary line.
pub fn render_catalog(videos: &[VideoRecord], base_url: &str) -> String {
    let mut out = String::new();
    for video in videos {
        out.push_str(&render_row(video, base_url));
        out.push('\n');
    }
    let s = CatalogSummary::of(videos);
    out.push_str(&format!(
        "{} video(s): {} completed, {} processing, {} failed",
        s.total(),
        s.completed,
        s.processing + s.other,
        s.failed
    ));
    out.push('\n');
    out
}

fn render_row(video: &VideoRecord, base_url: &str) -> String {
    let mut row = format!(
        "{:>6}  {:<10}  {}  {}  {}  {}  {}",
        video.id,
        video.status,
        video.account_name,
        video.game_mode,
        video.weapon,
        video.map_name,
        video.updated_at
    );
    if let Some(url) = download_url(base_url, video) {
        row.push_str("  ");
        row.push_str(&url);
    }
    row
}
