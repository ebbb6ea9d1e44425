//! Derived orderings and groupings of the post collection: the chronological
//! archive, the alphabetical contents, the hashtag index, the bounded
//! latest-posts list, and the prev/next adjacency links. All views are
//! re-sorts or re-groups of the same collection; none of them re-extract
//! metadata or disturb post identity.

use crate::post::Post;
use std::collections::BTreeMap;

/// How many posts the latest-posts snippet carries.
pub const LATEST_WINDOW: usize = 10;

/// Stable sort by date, most recent first. Ties keep their original input
/// order, which makes adjacency and every downstream view deterministic.
pub fn sort_chronological(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Fills in the prev/next links on a chronologically sorted collection.
/// `prev` points at the next-older neighbour and `next` at the next-newer
/// one, so the newest post has no `next` and the oldest no `prev`. A
/// collection of exactly one post self-loops on both.
pub fn link_adjacent(posts: &mut [Post]) {
    if posts.len() == 1 {
        posts[0].prev = posts[0].link.clone();
        posts[0].next = posts[0].link.clone();
        return;
    }
    for i in 0..posts.len() {
        if i + 1 < posts.len() {
            let older = posts[i + 1].link.clone();
            posts[i].prev = older;
        }
        if i > 0 {
            let newer = posts[i - 1].link.clone();
            posts[i].next = newer;
        }
    }
}

/// Returns the collection re-sorted by title, ascending byte order. The sort
/// is stable, so equal titles keep the incoming (chronological) order.
pub fn alphabetical(posts: &[Post]) -> Vec<&Post> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| a.title.cmp(&b.title));
    sorted
}

/// Groups posts by hashtag. Iterating the chronological collection and
/// appending keeps each bucket in chronological order; the [`BTreeMap`]
/// keeps the tags themselves in sorted order for deterministic output.
pub fn tag_index(posts: &[Post]) -> BTreeMap<&str, Vec<&Post>> {
    let mut index: BTreeMap<&str, Vec<&Post>> = BTreeMap::new();
    for post in posts {
        for tag in &post.hashtags {
            index.entry(tag.as_str()).or_default().push(post);
        }
    }
    index
}

/// The first `min(LATEST_WINDOW, len)` posts of the chronological view.
pub fn latest(posts: &[Post]) -> &[Post] {
    &posts[..posts.len().min(LATEST_WINDOW)]
}
