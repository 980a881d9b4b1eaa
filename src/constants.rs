//! Shared constants for the gallery engine.

pub const DEFAULT_DATA_URL: &str = "https://cdn.jsdelivr.net/gh/GCA-Classroom/apod/data.json";
pub const DEFAULT_TRIGGER_LABEL: &str = "Fetch Space Images";
pub const LOADING_TRIGGER_LABEL: &str = "Loading...";

pub const LOADING_MESSAGE: &str = "Loading space photos...";
pub const EMPTY_MESSAGE: &str = "No space images available right now. Please try again later.";
pub const ERROR_MESSAGE: &str = "We could not reach Mission Control. Please try again soon.";

pub const UNKNOWN_DATE: &str = "Unknown date";
pub const CARD_TITLE_FALLBACK: &str = "Untitled Space Image";
pub const ACCESSIBLE_TITLE_FALLBACK: &str = "NASA media";
pub const ALT_TITLE_FALLBACK: &str = "NASA Astronomy Picture of the Day";
pub const MODAL_TITLE_FALLBACK: &str = "NASA media";
pub const VIDEO_TITLE_FALLBACK: &str = "NASA video";
pub const EXPLANATION_FALLBACK: &str = "No description available.";

pub const IMAGE_UNAVAILABLE: &str = "Image not available.";
pub const MEDIA_UNAVAILABLE: &str = "No media available for this item.";
pub const EXTERNAL_VIDEO_LABEL: &str = "Open video in a new tab";
pub const VIDEO_PLACEHOLDER_LABEL: &str = "Watch video";
pub const VIDEO_BADGE: &str = "Video";

pub const FACT_HEADING: &str = "Did You Know?";
pub const FACT_FALLBACK: &str = "There is always something new to learn about our universe.";

pub const SPACE_FACTS: &[&str] = &[
    "Venus rotates so slowly that a single day there lasts longer than an entire Venusian year.",
    "A teaspoon of neutron star material would weigh about a billion tons on Earth.",
    "NASA's Voyager 1 spacecraft is the farthest human-made object from our planet.",
    "Saturn's rings are made mostly of water ice ranging from dust-sized particles to mountains.",
    "The International Space Station orbits Earth roughly every 90 minutes.",
    "Mars is home to Olympus Mons, the tallest volcano in the solar system at nearly 22 kilometers high.",
];
