//! Voices command handler.

use anyhow::Result;
use voxline_core::settings::{VOICE_ID_KEY, api_key};
use voxline_core::{CredentialStore, DEFAULT_VOICE_ID, VoiceCatalog, VoiceSummary};
use voxline_synth::DefaultSynthClient;

use crate::bootstrap::CliContext;

/// List voices, marking the one `speak` would use.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let key = api_key(ctx.store.as_ref())?;
    let client = DefaultSynthClient::new(&ctx.synth_config)?;

    let voices = client.list_voices(&key).await?;
    if voices.is_empty() {
        println!("No voices available.");
        return Ok(());
    }

    let selected = ctx
        .store
        .get(VOICE_ID_KEY)
        .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string());
    for line in format_table(&voices, &selected) {
        println!("{line}");
    }
    Ok(())
}

fn format_table(voices: &[VoiceSummary], selected: &str) -> Vec<String> {
    let mut lines = vec![format!("  {:<24} {:<28} {}", "VOICE ID", "NAME", "CATEGORY")];
    lines.extend(voices.iter().map(|voice| {
        let marker = if voice.voice_id == selected { '*' } else { ' ' };
        format!(
            "{marker} {:<24} {:<28} {}",
            voice.voice_id,
            voice.display_name,
            voice.category.as_deref().unwrap_or("-")
        )
    }));
    lines
}
