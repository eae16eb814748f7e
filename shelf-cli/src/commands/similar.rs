use anyhow::Context;

use shelf_core::{ReviewId, ShelfConfig, UserId};
use shelf_recommend::RecommendationEngine;

use super::{open_store, print_json, request_context};

pub async fn run(
    config: &ShelfConfig,
    review: ReviewId,
    user: Option<UserId>,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let engine = RecommendationEngine::new(&store, &store, config.recommend.clone());
    let ctx = request_context(config);

    let ranked = engine
        .similar_reviews(&ctx, review, user, limit)
        .await
        .with_context(|| format!("similar reviews for {review} failed"))?;

    if json {
        return print_json(&ranked);
    }
    if ranked.is_empty() {
        println!("No similar reviews for {review}.");
        return Ok(());
    }
    println!("{:>4}  {:>10}  {:>10}  {:>10}", "#", "review", "author", "similarity");
    for (rank, item) in ranked.iter().enumerate() {
        println!(
            "{:>4}  {:>10}  {:>10}  {:>10.4}",
            rank + 1,
            item.review_id,
            item.author_id,
            item.similarity
        );
    }
    Ok(())
}
