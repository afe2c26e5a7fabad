pub mod frequency_buckets;
pub mod intrusive_list;
pub mod rank_buckets;
pub mod slot_arena;

pub use frequency_buckets::FrequencyBuckets;
pub use intrusive_list::{IntrusiveList, ListLinks, NodeArena};
pub use rank_buckets::{Rank, RankBuckets};
pub use slot_arena::{SlotArena, SlotId};
