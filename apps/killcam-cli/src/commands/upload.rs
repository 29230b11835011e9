//! `killcam upload`: submit a clip with optional background music.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Args;
use killcam_protocol::VideoMetadata;
use killcam_settings::{PreferenceStore, ProfileStore};
use killcam_uploader::{
    HttpTransport, PipelineState, SubmitEvent, Submission, UploadCoordinator, UploadOptions,
};
use tokio::sync::mpsc;
use tracing::info;

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Gameplay clip (MP4).
    #[clap(long)]
    pub video: PathBuf,
    /// Background music (MP3), mixed in by the server.
    #[clap(long)]
    pub music: Option<PathBuf>,
    /// Account name; defaults to the stored profile.
    #[clap(long)]
    pub account: Option<String>,
    /// Game mode; defaults to the stored profile.
    #[clap(long)]
    pub game_mode: Option<String>,
    /// Weapon; defaults to the stored profile.
    #[clap(long)]
    pub weapon: Option<String>,
    /// Map name; defaults to the stored profile.
    #[clap(long)]
    pub map: Option<String>,
}

impl UploadArgs {
    /// Overlays the flags that were given on top of `stored`.
    pub fn merge_into(&self, stored: VideoMetadata) -> VideoMetadata {
        VideoMetadata {
            account_name: self.account.clone().unwrap_or(stored.account_name),
            game_mode: self.game_mode.clone().unwrap_or(stored.game_mode),
            weapon: self.weapon.clone().unwrap_or(stored.weapon),
            map_name: self.map.clone().unwrap_or(stored.map_name),
        }
    }
}

pub async fn run<S: PreferenceStore>(
    args: UploadArgs,
    base_url: &str,
    options: UploadOptions,
    profiles: &ProfileStore<S>,
) -> anyhow::Result<()> {
    let metadata = args.merge_into(profiles.load());
    profiles.save(&metadata).context("saving profile")?;

    let submission =
        Submission::prepare(Some(&args.video), args.music.as_deref(), metadata).await?;

    let transport = Arc::new(HttpTransport::new(base_url)?);
    let mut coordinator = UploadCoordinator::new(transport, options);
    let events = coordinator
        .take_events()
        .context("event stream already taken")?;
    let printer = tokio::spawn(print_events(events));

    info!(
        video = %args.video.display(),
        music = ?args.music,
        base_url,
        "submitting clip"
    );

    let result = tokio::select! {
        result = coordinator.submit(&submission) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    // Dropping the coordinator closes the event stream.
    drop(coordinator);
    let _ = printer.await;

    let Some(result) = result else {
        bail!("submission aborted");
    };
    let outcome = result?;

    println!("{}", serde_json::to_string_pretty(&outcome.processing)?);
    profiles
        .reset_keeping_account()
        .context("resetting profile")?;
    Ok(())
}

async fn print_events(mut events: mpsc::UnboundedReceiver<SubmitEvent>) {
    while let Some(event) = events.recv().await {
        if let Some(line) = render_event(&event) {
            println!("{line}");
        }
    }
}

/// One console line per event.
pub fn render_event(event: &SubmitEvent) -> Option<String> {
    match event {
        SubmitEvent::StateChanged(state) => render_state(*state),
        SubmitEvent::Progress {
            stream,
            loaded,
            total,
            percent,
        } => Some(format!("[{percent:5.1}%] {stream} {loaded}/{total} bytes")),
        SubmitEvent::Completed {
            video_filename,
            music_filename,
        } => Some(match music_filename {
            Some(music) => format!("uploaded {video_filename} with {music}"),
            None => format!("uploaded {video_filename}"),
        }),
        SubmitEvent::Failed { .. } => None,
    }
}

fn render_state(state: PipelineState) -> Option<String> {
    let label = match state {
        PipelineState::Idle => return None,
        PipelineState::UploadingMusic => "uploading music",
        PipelineState::UploadingVideo => "uploading video",
        PipelineState::Finalizing => "starting processing",
        PipelineState::Succeeded => "done",
        PipelineState::Failed(_) => return None,
    };
    Some(format!("-> {label}"))
}
