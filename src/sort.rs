//! Ordering helpers for tags and playlists
//!
//! Bracketed tags (`[artist:X]`, `[year:1999]`) are machine-derived labels
//! and always list after plain tags.

use crate::provider::PlaylistMetadata;
use crate::provider::types::MOSAIC_IMAGE_PREFIX;
use rand::Rng;
use rand::seq::SliceRandom;
use std::cmp::Ordering;

/// Alphabetical direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Display orderings for a list of playlists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaylistSort {
    #[default]
    TitleAsc,
    TitleDesc,
    DescriptionAsc,
    DescriptionDesc,
    NoCoversFirst,
}

/// Whether `tag` contains a `[...]` segment
#[must_use]
pub fn is_bracketed(tag: &str) -> bool {
    tag.find('[')
        .is_some_and(|open| tag[open + 1..].contains(']'))
}

/// Sort tags, plain tags first, each partition alphabetically in `order`
#[must_use]
pub fn sort_tags(tags: Vec<String>, order: SortOrder) -> Vec<String> {
    let (mut plain, mut bracketed): (Vec<_>, Vec<_>) =
        tags.into_iter().partition(|tag| !is_bracketed(tag));

    let compare = |a: &String, b: &String| match order {
        SortOrder::Ascending => alphabetical(a, b),
        SortOrder::Descending => alphabetical(b, a),
    };
    plain.sort_by(compare);
    bracketed.sort_by(compare);

    plain.extend(bracketed);
    plain
}

/// Sort playlists for display
pub fn sort_playlists(playlists: &mut [PlaylistMetadata], sort: PlaylistSort) {
    match sort {
        PlaylistSort::TitleAsc => playlists.sort_by(|a, b| alphabetical(&a.name, &b.name)),
        PlaylistSort::TitleDesc => playlists.sort_by(|a, b| alphabetical(&b.name, &a.name)),
        PlaylistSort::DescriptionAsc => {
            playlists.sort_by(|a, b| by_description(&a.description, &b.description));
        }
        PlaylistSort::DescriptionDesc => {
            playlists.sort_by(|a, b| by_description(&b.description, &a.description));
        }
        PlaylistSort::NoCoversFirst => playlists.sort_by_key(|p| !has_no_cover(p)),
    }
}

/// Shuffle in place (Fisher-Yates)
pub fn shuffle<T>(items: &mut [T]) {
    shuffle_with(items, &mut rand::thread_rng());
}

/// Shuffle in place with a caller-supplied random source
pub fn shuffle_with<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

fn alphabetical(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Descriptions opening with a number sort numerically, ahead of the rest
fn by_description(a: &str, b: &str) -> Ordering {
    match (leading_number(a), leading_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => alphabetical(a, b),
    }
}

/// Integer value of the digits opening the first four characters
fn leading_number(description: &str) -> Option<u32> {
    let head: String = description.chars().take(4).collect();
    let digits: String = head
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn has_no_cover(playlist: &PlaylistMetadata) -> bool {
    playlist
        .images
        .first()
        .is_none_or(|image| image.url.starts_with(MOSAIC_IMAGE_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Image;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn playlist(name: &str, description: &str, image: Option<&str>) -> PlaylistMetadata {
        PlaylistMetadata {
            uri: format!("spotify:playlist:{name}"),
            name: name.to_string(),
            description: description.to_string(),
            images: image
                .map(|url| Image {
                    url: url.to_string(),
                    label: String::new(),
                })
                .into_iter()
                .collect(),
            owner: None,
            can_play: true,
        }
    }

    fn names(playlists: &[PlaylistMetadata]) -> Vec<&str> {
        playlists.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_is_bracketed() {
        assert!(is_bracketed("[year:1999]"));
        assert!(is_bracketed("pre[fix]"));
        assert!(!is_bracketed("rock"));
        assert!(!is_bracketed("[open"));
        assert!(!is_bracketed("close]["));
    }

    #[test]
    fn test_sort_tags_brackets_last_ascending() {
        let tags = vec!["[year:1999]", "rock", "[artist:A]", "Jazz", "ambient"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            sort_tags(tags, SortOrder::Ascending),
            vec!["ambient", "Jazz", "rock", "[artist:A]", "[year:1999]"]
        );
    }

    #[test]
    fn test_sort_tags_brackets_last_descending() {
        let tags = vec!["[year:1999]", "rock", "[artist:A]", "ambient"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            sort_tags(tags, SortOrder::Descending),
            vec!["rock", "ambient", "[year:1999]", "[artist:A]"]
        );
    }

    #[test]
    fn test_sort_by_title() {
        let mut playlists = vec![playlist("b", "", None), playlist("A", "", None), playlist("c", "", None)];
        sort_playlists(&mut playlists, PlaylistSort::TitleAsc);
        assert_eq!(names(&playlists), vec!["A", "b", "c"]);
        sort_playlists(&mut playlists, PlaylistSort::TitleDesc);
        assert_eq!(names(&playlists), vec!["c", "b", "A"]);
    }

    #[test]
    fn test_sort_by_description_numbers_first() {
        let mut playlists = vec![
            playlist("x", "zebra", None),
            playlist("y", "2001 odyssey", None),
            playlist("z", "apple", None),
            playlist("w", "1999 party", None),
        ];
        sort_playlists(&mut playlists, PlaylistSort::DescriptionAsc);
        assert_eq!(names(&playlists), vec!["w", "y", "z", "x"]);

        sort_playlists(&mut playlists, PlaylistSort::DescriptionDesc);
        assert_eq!(names(&playlists), vec!["x", "z", "y", "w"]);
    }

    #[test]
    fn test_no_covers_first_is_stable() {
        let mut playlists = vec![
            playlist("a", "", Some("https://img/a")),
            playlist("b", "", None),
            playlist("c", "", Some("spotify:mosaic:1:2")),
            playlist("d", "", Some("https://img/d")),
        ];
        sort_playlists(&mut playlists, PlaylistSort::NoCoversFirst);
        assert_eq!(names(&playlists), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("1999 party"), Some(1999));
        assert_eq!(leading_number("12ab"), Some(12));
        assert_eq!(leading_number("abcd"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut items: Vec<u32> = (0..50).collect();
        let mut rng = StdRng::seed_from_u64(7);
        shuffle_with(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, sorted);
    }
}
