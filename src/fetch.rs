use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::parser;
use crate::record::QuestContext;
use crate::settings::Settings;

/// Fetch and parse one quest page per id, returning results in `ids` order.
///
/// The first network error aborts the whole batch; nothing is retried.
pub async fn fetch_quests(
    client: &Client,
    settings: &Settings,
    ids: &[String],
) -> Result<Vec<QuestContext>> {
    let t0 = Instant::now();
    let pb = ProgressBar::new(ids.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let result = if settings.concurrency <= 1 {
        fetch_sequential(client, settings, ids, &pb).await
    } else {
        fetch_bounded(client, settings, ids, &pb).await
    };

    pb.finish_and_clear();
    if let Ok(quests) = &result {
        let parsed = quests.iter().filter(|q| q.as_quest().is_some()).count();
        info!(
            "Fetched {} quest pages ({} parsed, {} unparseable) in {:.1}s",
            quests.len(),
            parsed,
            quests.len() - parsed,
            t0.elapsed().as_secs_f64()
        );
    }
    result
}

async fn fetch_sequential(
    client: &Client,
    settings: &Settings,
    ids: &[String],
    pb: &ProgressBar,
) -> Result<Vec<QuestContext>> {
    let mut quests = Vec::with_capacity(ids.len());
    for id in ids {
        quests.push(fetch_quest(client, settings, id).await?);
        pb.inc(1);
    }
    Ok(quests)
}

/// Parallel variant: at most `concurrency` requests in flight, results
/// collected in id order.
async fn fetch_bounded(
    client: &Client,
    settings: &Settings,
    ids: &[String],
    pb: &ProgressBar,
) -> Result<Vec<QuestContext>> {
    let semaphore = Arc::new(Semaphore::new(settings.concurrency));
    let settings = Arc::new(settings.clone());

    let mut handles = Vec::with_capacity(ids.len());
    for id in ids {
        let client = client.clone();
        let settings = Arc::clone(&settings);
        let sem = Arc::clone(&semaphore);
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            let _permit = sem.acquire_owned().await.ok();
            fetch_quest(&client, &settings, &id).await
        }));
    }

    let mut quests = Vec::with_capacity(handles.len());
    for i in 0..handles.len() {
        let outcome = match (&mut handles[i]).await {
            Ok(Ok(quest)) => Ok(quest),
            Ok(Err(e)) => Err(e),
            Err(e) => Err(PipelineError::Task(e)),
        };
        match outcome {
            Ok(quest) => {
                quests.push(quest);
                pb.inc(1);
            }
            Err(e) => {
                for h in &handles[i + 1..] {
                    h.abort();
                }
                return Err(e);
            }
        }
    }
    Ok(quests)
}

/// GET `base_url + id` and parse the body. A page that cannot be parsed is
/// tagged with the requested id so it can still be joined; a parsed record
/// keeps only what the page itself says.
pub async fn fetch_quest(client: &Client, settings: &Settings, id: &str) -> Result<QuestContext> {
    let url = settings.quest_url(id);
    debug!("GET {}", url);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| PipelineError::Fetch { url: url.clone(), source })?;
    let status = response.status();
    if !status.is_success() {
        warn!("{} returned {}", url, status);
    }
    let body = response
        .bytes()
        .await
        .map_err(|source| PipelineError::Fetch { url: url.clone(), source })?;

    Ok(tag_error(parser::parse_quest_bytes(&body), id))
}

fn tag_error(mut ctx: QuestContext, id: &str) -> QuestContext {
    if let QuestContext::Error(e) = &mut ctx {
        e.quest_id = Some(id.to_string());
    }
    ctx
}
