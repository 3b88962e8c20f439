use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use xactbank::formats::xsb::{HEADER_SIZE, WaveRef};
use xactbank::prelude::*;

/// Engine with a fixed wave bank list that accepts every category
#[derive(Default)]
struct TestEngine {
    wave_banks: Vec<String>,
    registered: Mutex<HashMap<CategoryHandle, Vec<String>>>,
    voices: AtomicUsize,
}

impl TestEngine {
    fn with_wave_banks(names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            wave_banks: names.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        })
    }

    fn registration_count(&self) -> usize {
        self.registered.lock().values().map(Vec::len).sum()
    }
}

impl WaveBankRegistry for TestEngine {
    fn wave_bank(&self, name: &str) -> Option<WaveBankHandle> {
        self.wave_banks
            .iter()
            .position(|n| n == name)
            .map(|i| WaveBankHandle(i as u32))
    }
}

impl CategoryRegistry for TestEngine {
    fn category(&self, id: CategoryId) -> Option<CategoryHandle> {
        Some(CategoryHandle(u32::from(id.0)))
    }

    fn register_cue(&self, category: CategoryHandle, cue: Arc<Cue>) {
        self.registered
            .lock()
            .entry(category)
            .or_default()
            .push(cue.name().to_string());
    }
}

impl AudioBackend for TestEngine {
    fn play(&self, _track: TrackHandle, _params: PlayParams) -> Result<VoiceId> {
        Ok(VoiceId(self.voices.fetch_add(1, Ordering::SeqCst) as u64))
    }

    fn apply_3d(&self, _voice: VoiceId, _listener: &AudioListener, _emitter: &AudioEmitter) {}

    fn is_playing(&self, _voice: VoiceId) -> bool {
        false
    }

    fn stop(&self, _voice: VoiceId) {}
}

/// Source that counts reads
struct CountingSource {
    bytes: Vec<u8>,
    reads: Arc<AtomicUsize>,
}

impl BankSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    fn read_all(&self) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

#[test]
fn test_simple_cue_roundtrip_preserves_order() {
    let names: Vec<String> = (0..12).map(|i| format!("ui_{i:02}")).collect();
    let mut builder = SoundBankBuilder::new("Interface").wave_bank("UiWaves");
    for (i, name) in names.iter().enumerate() {
        builder = builder.simple_cue(name, 3, 0, i as u16);
    }

    let bytes = builder.build().unwrap();
    let data = parse_soundbank_bytes(&bytes, &PermissiveWaveBanks::new(), &LoadOptions::default()).unwrap();

    let decoded: Vec<String> = data.cues.keys().cloned().collect();
    assert_eq!(decoded, names);
    assert_eq!(
        data.cues.len(),
        usize::from(data.header.num_simple_cues) + usize::from(data.header.num_complex_cues)
    );
    for (i, cue) in data.cues.values().enumerate() {
        assert_eq!(cue.kind, CueKind::Simple);
        assert_eq!(cue.category, CategoryId(3));
        let CueBody::Sound(XactSound::Composite(record)) = &cue.body else {
            panic!("expected a sound record");
        };
        assert_eq!(record.voices()[0].0.track, i as u16);
    }
}

#[test]
fn test_wave_variation_entries() {
    let bytes = SoundBankBuilder::new("Footsteps")
        .wave_bank("Steps")
        .complex_cue_variation(
            "step_stone",
            VariationSpec::wave(vec![(10, 0, 0, 84), (11, 0, 85, 169), (12, 0, 170, 255)]),
        )
        .build()
        .unwrap();
    let data = parse_soundbank_bytes(&bytes, &PermissiveWaveBanks::new(), &LoadOptions::default()).unwrap();

    let CueBody::Variation(table) = &data.cues["step_stone"].body else {
        panic!("expected a variation table");
    };
    assert_eq!(table.table_type, VariationTableType::Wave);
    let entries: Vec<(u16, u8, u8, u8)> = table
        .entries
        .iter()
        .map(|e| match &e.sound {
            XactSound::DirectTrack(WaveRef {
                track_index,
                wave_bank_index,
                ..
            }) => (*track_index, *wave_bank_index, e.weight_min, e.weight_max),
            XactSound::Composite(_) => panic!("expected direct tracks"),
        })
        .collect();
    assert_eq!(entries, vec![(10, 0, 0, 84), (11, 0, 85, 169), (12, 0, 170, 255)]);
}

#[test]
fn test_unsupported_variation_type_fails_whole_load() {
    let bytes = SoundBankBuilder::new("Bank")
        .wave_bank("Waves")
        .simple_cue("fine", 0, 0, 0)
        .complex_cue_variation("odd", VariationSpec::wave(vec![(0, 0, 0, 255)]))
        .build()
        .unwrap();
    let header = parse_soundbank_bytes(&bytes, &PermissiveWaveBanks::new(), &LoadOptions::default())
        .unwrap()
        .header;

    let mut patched = bytes;
    let at = header.variation_tables_offset as usize + 2;
    patched[at..at + 2].copy_from_slice(&(2u16 << 3).to_le_bytes());

    let engine = TestEngine::with_wave_banks(&["Waves"]);
    let bank = SoundBank::new(MemorySource::new("odd", patched), engine.clone());
    assert!(matches!(
        bank.get_cue("fine"),
        Err(Error::UnsupportedVariationType { table_type: 2, .. })
    ));
    assert_eq!(engine.registration_count(), 0);
    assert_eq!(bank.state(), BankState::Failed);
}

#[test]
fn test_mixed_category_variation() {
    let bytes = SoundBankBuilder::new("Bank")
        .wave_bank("Waves")
        .complex_cue_variation(
            "confused",
            VariationSpec::sound(vec![(SoundSpec::track(1, 0, 0), 0, 127), (SoundSpec::track(4, 0, 1), 128, 255)]),
        )
        .build()
        .unwrap();
    let result = parse_soundbank_bytes(&bytes, &PermissiveWaveBanks::new(), &LoadOptions::default());
    assert!(matches!(result, Err(Error::MixedCategoryVariation { first: 1, other: 4, .. })));
}

#[test]
fn test_bad_magic() {
    let mut bytes = SoundBankBuilder::new("Bank")
        .wave_bank("Waves")
        .simple_cue("a", 0, 0, 0)
        .build()
        .unwrap();
    bytes[0] = b'X';

    let engine = TestEngine::with_wave_banks(&["Waves"]);
    let bank = SoundBank::new(MemorySource::new("bad", bytes), engine.clone());
    assert!(matches!(bank.get_cue("a"), Err(Error::BadMagic(_))));
    assert_eq!(engine.registration_count(), 0);
}

#[test]
fn test_lazy_load_is_idempotent() {
    let bytes = SoundBankBuilder::new("Bank")
        .wave_bank("Waves")
        .simple_cue("a", 2, 0, 0)
        .simple_cue("b", 2, 0, 1)
        .build()
        .unwrap();
    let reads = Arc::new(AtomicUsize::new(0));
    let engine = TestEngine::with_wave_banks(&["Waves"]);
    let bank = SoundBank::new(
        CountingSource {
            bytes,
            reads: Arc::clone(&reads),
        },
        engine.clone(),
    );

    assert!(!bank.is_loaded());
    bank.get_cue("a").unwrap();
    bank.get_cue("b").unwrap();
    assert_eq!(reads.load(Ordering::SeqCst), 1);
    assert_eq!(engine.registration_count(), 2);
    assert_eq!(engine.registered.lock()[&CategoryHandle(2)], vec!["a", "b"]);

    bank.play_cue("b").unwrap();
    bank.tick();
    assert_eq!(bank.get_cue("b").unwrap().state(), CueState::Stopped);
}

#[test]
fn test_truncated_streams_fail_cleanly() {
    let full = SoundBankBuilder::new("Bank")
        .wave_bank("Waves")
        .simple_cue("a", 0, 0, 0)
        .complex_cue_variation("v", VariationSpec::compact_wave(vec![(1, 0), (2, 0)]))
        .build()
        .unwrap();

    for len in [0, 3, 4, 20, HEADER_SIZE - 1, HEADER_SIZE, HEADER_SIZE + 10, full.len() - 1] {
        let result = parse_soundbank_bytes(&full[..len], &PermissiveWaveBanks::new(), &LoadOptions::default());
        let err = result.expect_err("truncated stream should not decode");
        assert!(err.is_truncation(), "len {len}: {err:?}");
    }
}

#[test]
fn test_file_backed_bank() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Effects.xsb");
    SoundBankBuilder::new("Effects")
        .wave_bank("EffectWaves")
        .simple_cue("boom", 0, 0, 0)
        .write_to(&path)
        .unwrap();

    let engine = TestEngine::with_wave_banks(&["EffectWaves"]);
    let bank = SoundBank::open(&path, engine);
    assert_eq!(bank.cue_names().unwrap(), vec!["boom"]);
    assert_eq!(bank.name().as_deref(), Some("Effects"));
}
