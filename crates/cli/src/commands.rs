//! Subcommand implementations.
//!
//! Each command writes to the given writer so it can be exercised without
//! a terminal.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use moodmix_core::{
    streaming::authorize_url, Config, FetchOutcome, MoodCatalog, PlaybackEngine, ResultCache,
    SearchOptions, StreamingConfig, ThreadRandom, VideoRecord, VideoSourceClient, YouTubeApi,
};

pub fn build_source(config: &Config) -> Result<VideoSourceClient> {
    let api = YouTubeApi::new(config.youtube.clone()).context("Failed to create video API client")?;
    Ok(VideoSourceClient::new(
        Arc::new(api),
        Arc::new(MoodCatalog::builtin()),
        Arc::new(ResultCache::new(&config.cache)),
        Arc::new(ThreadRandom),
    ))
}

pub fn build_engine(config: &Config) -> Result<PlaybackEngine> {
    let source = build_source(config)?;
    Ok(PlaybackEngine::new(config.playback.clone(), Arc::new(source)))
}

pub fn print_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

pub fn list_moods(out: &mut dyn Write, json: bool) -> Result<()> {
    let catalog = MoodCatalog::builtin();
    if json {
        return print_json(out, &catalog.moods());
    }
    for mood in catalog.moods() {
        writeln!(
            out,
            "{} {:<10} {}",
            mood.glyph, mood.id, mood.description
        )?;
    }
    Ok(())
}

pub async fn search(
    out: &mut dyn Write,
    source: &VideoSourceClient,
    mood: &str,
    max_results: u32,
    no_cache: bool,
    json: bool,
) -> Result<()> {
    let mut options = SearchOptions::default().with_max_results(max_results);
    if no_cache {
        options = options.without_cache();
    }

    let results = source
        .search(mood, &options)
        .await
        .with_context(|| format!("Search for mood '{}' failed", mood))?;

    if json {
        return print_json(out, &results);
    }

    writeln!(out, "query: {} ({} results)", results.query, results.videos.len())?;
    for video in &results.videos {
        write_video(out, video)?;
    }
    Ok(())
}

pub async fn details(
    out: &mut dyn Write,
    source: &VideoSourceClient,
    video_id: &str,
    json: bool,
) -> Result<()> {
    let details = source
        .get_details(video_id, true)
        .await
        .with_context(|| format!("Lookup of video '{}' failed", video_id))?;

    if json {
        return print_json(out, &details);
    }

    write_video(out, &details.video)?;
    if let Some(secs) = details.duration_secs() {
        writeln!(out, "  duration: {}:{:02}", secs / 60, secs % 60)?;
    }
    if let Some(views) = details.view_count {
        writeln!(out, "  views: {}", views)?;
    }
    if let Some(likes) = details.like_count {
        writeln!(out, "  likes: {}", likes)?;
    }
    Ok(())
}

/// Select `mood`, then report `tracks` further videos as finished.
///
/// Stops early when the engine enters the error state.
pub async fn play(
    out: &mut dyn Write,
    engine: &PlaybackEngine,
    mood: &str,
    tracks: u32,
    json: bool,
) -> Result<()> {
    let mut outcome = engine.select_mood(mood).await;

    for played in 0..=tracks {
        match &outcome {
            FetchOutcome::Playing(video) => {
                if json {
                    print_json(out, &engine.snapshot().await)?;
                } else {
                    write_video(out, video)?;
                }
            }
            FetchOutcome::Failed(report) => {
                if json {
                    print_json(out, &engine.snapshot().await)?;
                } else {
                    writeln!(out, "error [{}]: {}", report.code, report.message)?;
                }
                return Ok(());
            }
            FetchOutcome::Stale => return Ok(()),
        }

        if played < tracks {
            outcome = engine.on_playback_ended().await?;
        }
    }
    Ok(())
}

pub fn auth_url(out: &mut dyn Write, config: Option<&StreamingConfig>) -> Result<()> {
    let config = config.context("No [streaming] section in the configuration")?;
    writeln!(out, "{}", authorize_url(config)?)?;
    Ok(())
}

fn write_video(out: &mut dyn Write, video: &VideoRecord) -> Result<()> {
    writeln!(
        out,
        "{}  {} ({})",
        video.id, video.title, video.channel_title
    )?;
    writeln!(out, "  https://www.youtube.com/watch?v={}", video.id)?;
    Ok(())
}
