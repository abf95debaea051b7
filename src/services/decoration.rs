use crate::models::{Destination, SuggestedDestination};

/// Query appended to every cover image URL
const IMAGE_PARAMS: &str = "?auto=format&fit=crop&q=80&w=1200";

/// Fixed, ordered set of cover images cycled over a result list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePool {
    images: &'static [&'static str],
}

impl ImagePool {
    /// Only used for the pool constants below, so an empty slice fails to compile
    const fn new(images: &'static [&'static str]) -> Self {
        assert!(!images.is_empty(), "image pool must not be empty");
        Self { images }
    }

    /// Image for the result at `index`: `pool[index mod len]`
    pub fn image_for(&self, index: usize) -> String {
        format!("{}{}", self.images[index % self.images.len()], IMAGE_PARAMS)
    }
}

#[cfg(test)]
impl ImagePool {
    pub(crate) fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether `url` was produced by this pool
    pub(crate) fn contains(&self, url: &str) -> bool {
        self.images
            .iter()
            .any(|image| url.strip_suffix(IMAGE_PARAMS) == Some(*image))
    }
}

pub const PERSONALIZED_POOL: ImagePool = ImagePool::new(&[
    "https://images.unsplash.com/photo-1476514525535-07fb3b4ae5f1",
    "https://images.unsplash.com/photo-1506929562872-bb421503ef21",
    "https://images.unsplash.com/photo-1464822759023-fed622ff2c3b",
    "https://images.unsplash.com/photo-1519046904884-53103b34b206",
    "https://images.unsplash.com/photo-1533929736458-ca588d08c8be",
]);

pub const TRENDING_POOL: ImagePool = ImagePool::new(&[
    "https://images.unsplash.com/photo-1518391846015-55a9cc003b25",
    "https://images.unsplash.com/photo-1523906834658-6e24ef2386f9",
    "https://images.unsplash.com/photo-1537996194471-e657df975ab4",
    "https://images.unsplash.com/photo-1513635269975-59663e0ac1ad",
    "https://images.unsplash.com/photo-1534008897163-3ec6c0a47d21",
    "https://images.unsplash.com/photo-1548013146-72479768bbaa",
]);

/// Attaches cover images by position, preserving response order
pub fn decorate(suggestions: Vec<SuggestedDestination>, pool: &ImagePool) -> Vec<Destination> {
    suggestions
        .into_iter()
        .enumerate()
        .map(|(index, suggestion)| suggestion.with_image(pool.image_for(index)))
        .collect()
}
