pub mod activity;
pub mod candidate_query;
pub mod degradation_event;
pub mod ranked;
pub mod review;

pub use activity::{ActivityCategory, ActivityEntry, ActivitySnapshot};
pub use candidate_query::{CandidateQuery, CandidateSort, VisibilityFilter};
pub use degradation_event::DegradationEvent;
pub use ranked::{CategoryRanking, RankedReview, Recommendation, RecommendationSource};
pub use review::{
    AccountStatus, PublicationStatus, ReviewId, ReviewRecord, ReviewVisibility, UserId,
};
