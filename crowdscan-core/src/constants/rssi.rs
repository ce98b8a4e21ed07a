//! Signal Strength Binning
//!
//! Range and resolution of the RSSI histograms.

/// Lower edge of the histogram range (dBm).
///
/// Around the noise floor of 2.4 GHz receivers; frames weaker than this
/// are rarely decoded at all. Anything lower lands in bin 0.
///
/// Source: reference sniffer firmware (`RSSI_MIN`)
pub const RSSI_MIN_DBM: i32 = -120;

/// Upper edge of the histogram range (dBm).
///
/// A device a metre or two from the antenna. Anything stronger lands in
/// the last bin.
///
/// Source: reference sniffer firmware (`RSSI_MAX`)
pub const RSSI_MAX_DBM: i32 = -40;

/// Number of histogram bins.
///
/// 80 dB span / 40 bins = 2 dB per bin, finer than the ±3 dB repeatability
/// of typical radio front ends.
///
/// Source: reference sniffer firmware (`RSSI_BINS`)
pub const RSSI_BIN_COUNT: usize = 40;
