//! `killcam profile`: inspect or clear stored form defaults.

use clap::Subcommand;
use killcam_protocol::VideoMetadata;
use killcam_settings::{PreferenceStore, ProfileStore};

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    /// Print the stored defaults (the default action).
    Show,
    /// Forget the stored defaults.
    Clear,
}

pub fn run<S: PreferenceStore>(
    action: Option<ProfileAction>,
    profiles: &ProfileStore<S>,
) -> anyhow::Result<()> {
    match action.unwrap_or(ProfileAction::Show) {
        ProfileAction::Show => print!("{}", render_profile(&profiles.load())),
        ProfileAction::Clear => {
            profiles.clear()?;
            println!("profile cleared");
        }
    }
    Ok(())
}

fn render_profile(meta: &VideoMetadata) -> String {
    let show = |v: &str| if v.is_empty() { "-".to_string() } else { v.to_string() };
    format!(
        "account:   {}\ngame mode: {}\nweapon:    {}\nmap:       {}\n",
        show(&meta.account_name),
        show(&meta.game_mode),
        show(&meta.weapon),
        show(&meta.map_name)
    )
}
