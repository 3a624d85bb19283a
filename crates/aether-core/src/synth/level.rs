/// Mean of the first `low_bins` byte-spectrum bins, normalized to [0, 1].
/// Ambient material lives mostly in the low bins, so the upper spectrum is
/// ignored.
pub fn spectrum_level(bins: &[u8], low_bins: usize) -> f32 {
    let take = bins.len().min(low_bins.max(1));
    if take == 0 {
        return 0.0;
    }
    let sum: u32 = bins[..take].iter().map(|b| *b as u32).sum();
    (sum as f32 / (take as f32 * 255.0)).clamp(0.0, 1.0)
}
