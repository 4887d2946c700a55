/// Nearest-named-color classification over a fixed palette.
///
/// Iteration order of `PALETTE` is the tie-break order: the first entry at
/// the minimum distance wins.
use crate::models::Rgb;

/// Name returned for input that is not three integers
pub const DEFAULT_COLOR: &str = "black";

pub const PALETTE: [(&str, Rgb); 13] = [
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("pink", Rgb::new(255, 192, 203)),
    ("orange", Rgb::new(255, 165, 0)),
    ("brown", Rgb::new(165, 42, 42)),
    ("grey", Rgb::new(128, 128, 128)),
    ("navy", Rgb::new(0, 0, 128)),
    ("beige", Rgb::new(245, 245, 220)),
];

/// Returns the palette name closest to `rgb` by Euclidean distance
pub fn nearest_color(rgb: Rgb) -> &'static str {
    let mut nearest = DEFAULT_COLOR;
    let mut min_distance = f64::MAX;

    for (name, reference) in PALETTE.iter() {
        let distance = rgb.distance(reference);
        if distance < min_distance {
            min_distance = distance;
            nearest = *name;
        }
    }

    nearest
}

/// Classifies a loosely formatted color sample such as `rgb(12, 34, 56)`
pub fn classify(sample: &str) -> &'static str {
    match Rgb::parse_loose(sample) {
        Some(rgb) => nearest_color(rgb),
        None => DEFAULT_COLOR,
    }
}

/// Classifies every sample, dropping repeated names but keeping first-seen order
pub fn normalize_all<S: AsRef<str>>(samples: &[S]) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::with_capacity(samples.len());
    for sample in samples {
        let name = classify(sample.as_ref());
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
