//! PSX SPU ADSR envelopes.
//!
//! The console describes a voice's volume envelope as two 16-bit register
//! words of shifts and steps. Synthesis wants continuous times instead, so
//! the conversion below approximates each phase with a duration in seconds.

/// SPU clock used to count envelope cycles.
pub const SAMPLE_RATE: f64 = 44100.0;

const MAX_AMPLITUDE: i32 = 0x8000;
/// Exponential attack is cut short above this level.
const EXP_ATTACK_CUTOFF: i32 = 0x6000;
/// Floor for the exponential decay target.
const EXP_MIN_AMPLITUDE: f64 = 0.1;

/// Raw fields of the two ADSR words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AdsrFields {
    pub attack_exponential: bool,
    pub attack_shift: u8,
    /// Raw 2-bit step; the SPU adds 4 before use.
    pub attack_step: u8,
    pub decay_shift: u8,
    /// Sustain nibble; the level is `(n + 1) * 0x800`.
    pub sustain_level: u8,
    pub sustain_exponential: bool,
    pub sustain_decrease: bool,
    pub sustain_shift: u8,
    pub sustain_step: u8,
    pub release_exponential: bool,
    pub release_shift: u8,
}

impl AdsrFields {
    /// Clamp every field to the bits its register holds.
    const fn masked(&self) -> Self {
        Self {
            attack_shift: self.attack_shift & 0x1F,
            attack_step: self.attack_step & 0x3,
            decay_shift: self.decay_shift & 0xF,
            sustain_level: self.sustain_level & 0xF,
            sustain_shift: self.sustain_shift & 0x1F,
            sustain_step: self.sustain_step & 0x3,
            release_shift: self.release_shift & 0x1F,
            ..*self
        }
    }

    /// Split the low and high register words.
    pub const fn from_words(low: u16, high: u16) -> Self {
        Self {
            attack_exponential: low & 0x8000 != 0,
            attack_shift: ((low & 0x7C00) >> 10) as u8,
            attack_step: ((low & 0x300) >> 8) as u8,
            decay_shift: ((low & 0xF0) >> 4) as u8,
            sustain_level: (low & 0xF) as u8,
            sustain_exponential: high & 0x8000 != 0,
            sustain_decrease: high & 0x4000 != 0,
            sustain_shift: ((high & 0x1F00) >> 8) as u8,
            sustain_step: ((high & 0xC0) >> 6) as u8,
            release_exponential: high & 0x20 != 0,
            release_shift: (high & 0x1F) as u8,
        }
    }
}

/// Continuous-time volume envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VolumeEnvelope {
    /// Seconds from silence to full volume.
    pub attack_time: f64,
    /// Seconds from full volume down to the sustain level.
    pub decay_time: f64,
    /// Sustain volume in `0.0..=1.0`.
    pub sustain_level: f64,
    /// Seconds for a linear release from full volume to silence.
    pub linear_release_time: f64,
    /// Release should be applied exponentially at playback.
    pub exp_release: bool,
}

impl VolumeEnvelope {
    /// Convert the two ADSR register words.
    pub fn from_adsr(low: u16, high: u16) -> Self {
        Self::from_fields(&AdsrFields::from_words(low, high))
    }

    /// Convert unpacked fields.
    ///
    /// Fields are masked to their register widths first, so any value
    /// yields a finite envelope.
    pub fn from_fields(fields: &AdsrFields) -> Self {
        let fields = &fields.masked();
        let sustain_level =
            ((fields.sustain_level as i32 + 1) * 0x800) as f64 / MAX_AMPLITUDE as f64;

        let (decay_step, decay_time_step) = decrease_rate(fields.decay_shift);
        let decay_target = sustain_level.max(EXP_MIN_AMPLITUDE);

        let (release_step, release_time_step) = decrease_rate(fields.release_shift);

        Self {
            attack_time: attack_time(fields),
            decay_time: -decay_target.ln() / (decay_step / decay_time_step),
            sustain_level,
            linear_release_time: 1.0 / (release_step / release_time_step),
            exp_release: fields.release_exponential,
        }
    }
}

/// Count SPU cycles until the attack reaches full volume.
///
/// The exponential curve is approximated by stopping early once the level
/// passes 0x6000. This makes exponential attacks slightly fast.
fn attack_time(fields: &AdsrFields) -> f64 {
    let shift = fields.attack_shift as i32;
    let cycles = 1i64 << (shift - 11).max(0);
    let step = (fields.attack_step as i32 + 4) << (11 - shift).max(0);

    let mut samples = 0i64;
    let mut level = 0i32;
    while level < MAX_AMPLITUDE {
        if fields.attack_exponential && level > EXP_ATTACK_CUTOFF {
            break;
        }
        samples += cycles;
        level += step;
    }

    samples as f64 / SAMPLE_RATE
}

/// Amplitude lost per tick and tick length for a fixed "-8" decrease.
fn decrease_rate(shift: u8) -> (f64, f64) {
    let shift = shift as i32;
    let cycles = 1i32 << (shift - 11).max(0);
    let step = 8i32 << (11 - shift).max(0);
    (
        step as f64 / MAX_AMPLITUDE as f64,
        cycles as f64 / SAMPLE_RATE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn low(attack_exp: bool, attack_shift: u16, attack_step: u16, decay_shift: u16, sustain: u16) -> u16 {
        ((attack_exp as u16) << 15)
            | (attack_shift << 10)
            | (attack_step << 8)
            | (decay_shift << 4)
            | sustain
    }

    #[test]
    fn test_field_split() {
        let f = AdsrFields::from_words(0xFFFF, 0xFFFF);
        assert!(f.attack_exponential);
        assert_eq!(f.attack_shift, 0x1F);
        assert_eq!(f.attack_step, 3);
        assert_eq!(f.decay_shift, 0xF);
        assert_eq!(f.sustain_level, 0xF);
        assert!(f.sustain_exponential && f.sustain_decrease);
        assert_eq!(f.sustain_shift, 0x1F);
        assert_eq!(f.sustain_step, 3);
        assert!(f.release_exponential);
        assert_eq!(f.release_shift, 0x1F);

        assert_eq!(AdsrFields::from_words(0, 0).attack_step, 0);
    }

    #[test]
    fn test_default_fields_terminate() {
        let env = VolumeEnvelope::from_fields(&AdsrFields::default());
        assert_eq!(env, VolumeEnvelope::from_adsr(0, 0));
        assert_eq!(env.attack_time, 4.0 / SAMPLE_RATE);
    }

    #[test]
    fn test_out_of_range_fields_are_masked() {
        let wide = AdsrFields {
            attack_shift: 0xFF,
            attack_step: 0xFC,
            decay_shift: 0xFF,
            sustain_level: 0xF0,
            release_shift: 0xFF,
            ..AdsrFields::default()
        };
        let env = VolumeEnvelope::from_fields(&wide);
        let expected = VolumeEnvelope::from_fields(&AdsrFields {
            attack_shift: 0x1F,
            decay_shift: 0xF,
            release_shift: 0x1F,
            ..AdsrFields::default()
        });
        assert_eq!(env, expected);
        assert!(env.attack_time.is_finite() && env.linear_release_time.is_finite());
    }

    #[test]
    fn test_slow_attack_is_longer() {
        let fast = VolumeEnvelope::from_adsr(low(false, 0x00, 0, 0, 0), 0);
        let slow = VolumeEnvelope::from_adsr(low(false, 0x1F, 0, 0, 0), 0);
        assert!(slow.attack_time > fast.attack_time);

        // Step 4 << 11 reaches 0x8000 in four single-cycle ticks.
        assert_eq!(fast.attack_time, 4.0 / SAMPLE_RATE);
        // 1 << 20 cycles per tick, 0x8000 / 4 ticks.
        assert_eq!(slow.attack_time, (8192.0 * 1048576.0) / SAMPLE_RATE);
    }

    #[test]
    fn test_exponential_attack_stops_early() {
        let linear = VolumeEnvelope::from_adsr(low(false, 10, 0, 0, 0), 0);
        let exponential = VolumeEnvelope::from_adsr(low(true, 10, 0, 0, 0), 0);

        // 8 per tick: 4096 ticks linear, cut off after passing 0x6000.
        assert_eq!(linear.attack_time, 4096.0 / SAMPLE_RATE);
        assert_eq!(exponential.attack_time, 3073.0 / SAMPLE_RATE);
    }

    #[test]
    fn test_sustain_levels() {
        assert_eq!(VolumeEnvelope::from_adsr(low(false, 0, 0, 0, 0xF), 0).sustain_level, 1.0);
        assert_eq!(VolumeEnvelope::from_adsr(low(false, 0, 0, 0, 0x0), 0).sustain_level, 0.0625);
        assert_eq!(VolumeEnvelope::from_adsr(low(false, 0, 0, 0, 0x7), 0).sustain_level, 0.5);
    }

    #[test]
    fn test_decay_to_full_sustain_is_instant() {
        let env = VolumeEnvelope::from_adsr(low(false, 0, 0, 4, 0xF), 0);
        assert_eq!(env.decay_time, 0.0);

        let env = VolumeEnvelope::from_adsr(low(false, 0, 0, 4, 0x0), 0);
        assert!(env.decay_time > 0.0);
    }

    #[test]
    fn test_release() {
        // Shift 0: 8 << 11 per single-cycle tick, half the range per sample.
        let env = VolumeEnvelope::from_adsr(0, 0x0000);
        assert_eq!(env.linear_release_time, 1.0 / (0.5 / (1.0 / SAMPLE_RATE)));
        assert!(!env.exp_release);

        let env = VolumeEnvelope::from_adsr(0, 0x0020 | 0x1F);
        assert!(env.exp_release);
        // 1 << 20 cycles per tick at step 8.
        assert_eq!(
            env.linear_release_time,
            1.0 / ((8.0 / 32768.0) / (1048576.0 / SAMPLE_RATE))
        );
    }
}
