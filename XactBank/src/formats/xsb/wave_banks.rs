//! Wave bank name table and track resolution
//!
//! SPDX-FileCopyrightText: 2026 `CyberDeco`, 2006 The Mono.Xna Team (`MonoGame`, MIT)
//!
//! SPDX-License-Identifier: MIT

use super::BANK_NAME_SIZE;
use super::header::SoundBankHeader;
use crate::engine::{TrackHandle, WaveBankHandle, WaveBankRegistry};
use crate::error::{Error, Result};
use crate::formats::common::BinaryCursor;

/// A wave bank referenced by the `SoundBank`, resolved against the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveBankRef {
    pub name: String,
    pub handle: WaveBankHandle,
}

/// Resolve the wave bank name table. All names must resolve.
pub fn read_wave_bank_table(
    cursor: &mut BinaryCursor<'_>,
    header: &SoundBankHeader,
    registry: &dyn WaveBankRegistry,
) -> Result<Vec<WaveBankRef>> {
    cursor.seek(header.wave_bank_name_table_offset as usize)?;

    let mut wave_banks = Vec::with_capacity(usize::from(header.num_wave_banks));
    for _ in 0..header.num_wave_banks {
        let name = cursor.read_fixed_string(BANK_NAME_SIZE)?;
        let Some(handle) = registry.wave_bank(&name) else {
            return Err(Error::UnknownWaveBank(name));
        };
        tracing::debug!("Resolved wave bank '{}' -> {:?}", name, handle);
        wave_banks.push(WaveBankRef { name, handle });
    }
    Ok(wave_banks)
}

/// Turns `(wave_bank_index, track_index)` pairs from records into track handles
pub struct WaveResolver<'r> {
    wave_banks: &'r [WaveBankRef],
    registry: &'r dyn WaveBankRegistry,
}

impl<'r> WaveResolver<'r> {
    pub fn new(wave_banks: &'r [WaveBankRef], registry: &'r dyn WaveBankRegistry) -> Self {
        Self {
            wave_banks,
            registry,
        }
    }

    pub fn resolve(&self, wave_bank_index: u8, track_index: u16) -> Result<TrackHandle> {
        let bank = self
            .wave_banks
            .get(usize::from(wave_bank_index))
            .ok_or(Error::WaveBankIndexOutOfRange {
                index: wave_bank_index,
                count: self.wave_banks.len(),
            })?;

        self.registry
            .track(bank.handle, track_index)
            .ok_or_else(|| Error::UnknownTrack {
                wave_bank: bank.name.clone(),
                track: track_index,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::xsb::header::parse_header;
    use crate::formats::xsb::writer::SoundBankBuilder;
    use std::collections::HashMap;

    struct FixedBanks {
        banks: HashMap<&'static str, (WaveBankHandle, u16)>,
    }

    impl WaveBankRegistry for FixedBanks {
        fn wave_bank(&self, name: &str) -> Option<WaveBankHandle> {
            self.banks.get(name).map(|(handle, _)| *handle)
        }

        fn track(&self, wave_bank: WaveBankHandle, track: u16) -> Option<TrackHandle> {
            let (_, count) = self.banks.values().find(|(h, _)| *h == wave_bank)?;
            (track < *count).then_some(TrackHandle { wave_bank, track })
        }
    }

    fn registry() -> FixedBanks {
        FixedBanks {
            banks: HashMap::from([
                ("Music", (WaveBankHandle(10), 4)),
                ("Effects", (WaveBankHandle(11), 2)),
            ]),
        }
    }

    #[test]
    fn test_table_resolves_in_order() {
        let bytes = SoundBankBuilder::new("Bank")
            .wave_bank("Effects")
            .wave_bank("Music")
            .build()
            .unwrap();
        let mut cursor = BinaryCursor::new(&bytes);
        let header = parse_header(&mut cursor).unwrap();
        let banks = read_wave_bank_table(&mut cursor, &header, &registry()).unwrap();

        assert_eq!(banks.len(), 2);
        assert_eq!(banks[0].name, "Effects");
        assert_eq!(banks[0].handle, WaveBankHandle(11));
        assert_eq!(banks[1].handle, WaveBankHandle(10));
    }

    #[test]
    fn test_unknown_wave_bank() {
        let bytes = SoundBankBuilder::new("Bank")
            .wave_bank("Music")
            .wave_bank("Voices")
            .build()
            .unwrap();
        let mut cursor = BinaryCursor::new(&bytes);
        let header = parse_header(&mut cursor).unwrap();
        let err = read_wave_bank_table(&mut cursor, &header, &registry()).unwrap_err();
        assert!(matches!(err, Error::UnknownWaveBank(name) if name == "Voices"));
    }

    #[test]
    fn test_resolver_bounds() {
        let registry = registry();
        let banks = vec![WaveBankRef {
            name: "Effects".to_string(),
            handle: WaveBankHandle(11),
        }];
        let resolver = WaveResolver::new(&banks, &registry);

        assert_eq!(
            resolver.resolve(0, 1).unwrap(),
            TrackHandle {
                wave_bank: WaveBankHandle(11),
                track: 1
            }
        );
        assert!(matches!(
            resolver.resolve(1, 0),
            Err(Error::WaveBankIndexOutOfRange { index: 1, count: 1 })
        ));
        assert!(matches!(
            resolver.resolve(0, 2),
            Err(Error::UnknownTrack { track: 2, .. })
        ));
    }
}
