//! Sound banks ready for synthesis.

use byteorder::{ByteOrder, LittleEndian};

use crate::envelope::VolumeEnvelope;
use crate::vab::Vab;
use crate::{Error, Result};

/// Tones whose attack takes longer than this are played looped.
const LOOP_ATTACK_THRESHOLD: f64 = 0.5;

/// Program mode that enables reverb.
const REVERB_MODE: u8 = 4;

/// One playable tone of a program.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tone {
    /// `0.0..=1.0`.
    pub volume: f32,
    /// `-1.0` (left) to `1.0` (right).
    pub pan: f32,
    pub root_key: u8,
    pub min_key: u8,
    pub max_key: u8,
    /// Fine tuning in semitones.
    pub pitch: f32,
    pub reverb: bool,
    pub looped: bool,
    pub envelope: VolumeEnvelope,
    /// Index into [`SoundBank::samples`].
    pub sample: usize,
}

impl Tone {
    /// Whether `key` falls in this tone's key range.
    pub fn covers(&self, key: u8) -> bool {
        (self.min_key..=self.max_key).contains(&key)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Program {
    pub tones: Vec<Tone>,
}

/// Programs and 16-bit PCM samples of one bank.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SoundBank {
    #[cfg_attr(feature = "serde", serde(skip))]
    pub samples: Vec<Vec<i16>>,
    /// All 128 program slots.
    pub programs: Vec<Program>,
}

impl SoundBank {
    /// Assemble a bank from a header and its little-endian PCM sample blocks.
    ///
    /// Tones without a sample are dropped.
    pub fn from_vab<B: AsRef<[u8]>>(vab: &Vab, sample_blocks: &[B]) -> Result<Self> {
        let samples: Vec<Vec<i16>> = sample_blocks
            .iter()
            .map(|block| {
                let bytes = block.as_ref();
                let mut pcm = vec![0i16; bytes.len() / 2];
                LittleEndian::read_i16_into(&bytes[..pcm.len() * 2], &mut pcm);
                pcm
            })
            .collect();

        let mut programs = Vec::with_capacity(vab.programs.len());
        for (p, (attributes, tones)) in vab.programs.iter().zip(&vab.tones).enumerate() {
            let mut program = Program::default();

            for (t, raw) in tones.iter().enumerate() {
                let vag = raw.vag.get();
                if vag == 0 {
                    continue;
                }
                if vag < 0 || vag as usize > samples.len() {
                    return Err(Error::SampleOutOfRange {
                        program: p,
                        tone: t,
                        vag,
                        available: samples.len(),
                    });
                }

                let envelope = VolumeEnvelope::from_adsr(raw.adsr1.get(), raw.adsr2.get());
                program.tones.push(Tone {
                    volume: raw.volume as f32 / 127.0,
                    pan: raw.pan as f32 / 64.0 - 1.0,
                    root_key: raw.center,
                    min_key: raw.min,
                    max_key: raw.max,
                    pitch: raw.shift as f32 / 100.0,
                    reverb: attributes.mode == REVERB_MODE,
                    looped: envelope.attack_time > LOOP_ATTACK_THRESHOLD,
                    envelope,
                    sample: vag as usize - 1,
                });
            }

            programs.push(program);
        }

        Ok(Self { samples, programs })
    }

    /// Tones of `program` that play for `key`.
    pub fn tones_for_key(&self, program: usize, key: u8) -> impl Iterator<Item = &Tone> {
        self.programs
            .get(program)
            .into_iter()
            .flat_map(|p| p.tones.iter())
            .filter(move |t| t.covers(key))
    }

    /// PCM data of a tone's sample.
    pub fn sample(&self, tone: &Tone) -> Option<&[i16]> {
        self.samples.get(tone.sample).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vab::tests::{build_vab, TestTone};

    fn tone(vag: i16, adsr1: u16) -> TestTone {
        TestTone {
            volume: 127,
            pan: 32,
            shift: 25,
            adsr1,
            vag,
        }
    }

    #[test]
    fn test_from_vab() {
        // Attack shift 0x1F is far slower than half a second.
        let slow_attack = 0x1F << 10;
        let data = build_vab(
            &[
                (0, 4, vec![tone(1, 0), tone(0, 0), tone(2, slow_attack)]),
                (5, 0, vec![tone(1, 0)]),
            ],
            &[1, 1],
        );
        let vab = Vab::parse(&data).unwrap();
        let blocks = vec![
            vec![0x01, 0x00, 0xFF, 0xFF, 0x00, 0x80, 0x7F],
            vec![0u8; 8],
        ];
        let bank = SoundBank::from_vab(&vab, &blocks).unwrap();

        // Trailing odd byte is dropped.
        assert_eq!(bank.samples[0], vec![1, -1, i16::MIN]);
        assert_eq!(bank.programs.len(), 128);

        let p0 = &bank.programs[0];
        assert_eq!(p0.tones.len(), 2, "vag 0 tone is skipped");
        let first = &p0.tones[0];
        assert_eq!(first.volume, 1.0);
        assert_eq!(first.pan, -0.5);
        assert_eq!(first.pitch, 0.25);
        assert!(first.reverb);
        assert!(!first.looped);
        assert_eq!(first.sample, 0);

        assert!(p0.tones[1].looped);
        assert_eq!(p0.tones[1].sample, 1);
        assert!(!bank.programs[5].tones[0].reverb);

        assert_eq!(bank.tones_for_key(0, 60).count(), 2);
        assert_eq!(bank.tones_for_key(200, 60).count(), 0);
        assert_eq!(bank.sample(&p0.tones[1]).map(<[i16]>::len), Some(4));
    }

    #[test]
    fn test_missing_sample() {
        let data = build_vab(&[(0, 0, vec![tone(3, 0)])], &[1]);
        let vab = Vab::parse(&data).unwrap();
        let err = SoundBank::from_vab(&vab, &[vec![0u8; 8]]).unwrap_err();
        assert!(matches!(err, Error::SampleOutOfRange { vag: 3, .. }));
    }
}
