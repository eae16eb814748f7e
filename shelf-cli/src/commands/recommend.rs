use anyhow::Context;

use shelf_core::models::{Recommendation, RecommendationSource};
use shelf_core::{ShelfConfig, UserId};
use shelf_recommend::{RecommendationEngine, RecommendationFeed};

use super::{open_store, print_json, request_context};

pub async fn run(
    config: &ShelfConfig,
    user: Option<UserId>,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let engine = RecommendationEngine::new(&store, &store, config.recommend.clone());
    let ctx = request_context(config);
    let limit = limit.unwrap_or(config.recommend.feed_limit);

    let feed = engine
        .recommend(&ctx, user, limit)
        .await
        .context("recommendation failed")?;

    if json {
        return print_json(&feed);
    }
    print_feed(&feed);
    Ok(())
}

fn print_feed(feed: &RecommendationFeed) {
    if feed.is_empty() {
        println!("No recommendations.");
    } else {
        println!("{:>4}  {:>10}  {:>10}  {:>10}  source", "#", "review", "author", "score");
        for (rank, item) in feed.items.iter().enumerate() {
            println!("{}", format_row(rank + 1, item));
        }
    }
    if feed.fallback_used {
        println!("(recent-reviews fallback)");
    }
    for event in &feed.degraded {
        println!("degraded: {} ({})", event.component, event.failure);
    }
}

fn format_row(rank: usize, item: &Recommendation) -> String {
    let score = item
        .similarity
        .map(|s| format!("{s:.4}"))
        .unwrap_or_else(|| "-".to_string());
    let source = match item.source {
        RecommendationSource::Category(category) => category.to_string(),
        RecommendationSource::Recent => "recent".to_string(),
    };
    format!(
        "{rank:>4}  {:>10}  {:>10}  {score:>10}  {source}",
        item.review_id, item.author_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::ActivityCategory;

    #[test]
    fn row_shows_category_and_score() {
        let item = Recommendation {
            review_id: 201,
            author_id: 9,
            similarity: Some(0.5),
            source: RecommendationSource::Category(ActivityCategory::Viewed),
        };
        let row = format_row(1, &item);
        assert!(row.contains("201"));
        assert!(row.contains("0.5000"));
        assert!(row.ends_with("viewed"));
    }

    #[test]
    fn fallback_row_has_no_score() {
        let item = Recommendation {
            review_id: 3,
            author_id: 1,
            similarity: None,
            source: RecommendationSource::Recent,
        };
        let row = format_row(2, &item);
        assert!(row.contains(" - "));
        assert!(row.ends_with("recent"));
    }
}
