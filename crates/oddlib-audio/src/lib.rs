//! Sound bank support for Oddworld game files.
//!
//! Music and sound effects use the console's VAB format: a header of
//! programs and tones plus a body of samples. Each tone's volume envelope is
//! stored as a pair of SPU ADSR register words, which [`VolumeEnvelope`]
//! turns into attack, decay, sustain and release values in seconds.
//!
//! # Example
//!
//! ```no_run
//! use oddlib_audio::{SoundBank, Vab, VolumeEnvelope};
//!
//! let header = std::fs::read("MONK.VH")?;
//! let body = std::fs::read("MONK.VB")?;
//!
//! let vab = Vab::parse(&header)?;
//! let bank = SoundBank::from_vab(&vab, &vab.split_samples(&body)?)?;
//! for tone in bank.tones_for_key(0, 60) {
//!     println!("{:?}", tone.envelope);
//! }
//!
//! let env = VolumeEnvelope::from_adsr(0x80FF, 0x5FC0);
//! println!("attack {:.3}s", env.attack_time);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod envelope;
mod error;
mod soundbank;
mod vab;

pub use envelope::{AdsrFields, VolumeEnvelope, SAMPLE_RATE};
pub use error::{Error, Result};
pub use soundbank::{Program, SoundBank, Tone};
pub use vab::{
    ProgramAttributes, ToneAttributes, Vab, VabHeader, MAX_PROGRAMS, TONES_PER_PROGRAM, VAB_MAGIC,
};
