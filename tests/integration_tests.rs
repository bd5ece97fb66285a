//! Integration tests for Stegvault
//!
//! Exercise the public engine API end to end:
//! - Round-trips at every bit depth, with and without compression/encryption
//! - Capacity limits and all-or-nothing embedding
//! - Minimal perturbation of the carrier
//! - Foreign carriers, wrong keys and tampered payloads
//! - File-level carriers through the lossless image boundary

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use stegvault::addressing::Layout;
use stegvault::carrier::{self, CarrierError};
use stegvault::quality;
use stegvault::{
    capacity, digest, embed, extract, locate, read_header, BitDepth, Embedder, EngineConfig,
    Extractor, PixelGrid, StegoError, HEADER_BITS, HEADER_LEN,
};

const KEY: [u8; 32] = *b"0123456789abcdef0123456789abcdef";
const OTHER_KEY: [u8; 32] = *b"fedcba9876543210fedcba9876543210";

fn key() -> Option<&'static [u8]> {
    Some(&KEY[..])
}

/// Deterministic gradient carrier.
fn create_test_grid(width: u32, height: u32, channels: u8) -> PixelGrid {
    PixelGrid::from_fn(width, height, channels, |x, y, c| match c {
        0 => ((x * 17) % 256) as u8,
        1 => ((y * 23) % 256) as u8,
        2 => (((x + y) * 31) % 256) as u8,
        _ => 255,
    })
    .unwrap()
}

/// Noisy carrier with every channel value random.
fn create_noise_grid(width: u32, height: u32, seed: u64) -> PixelGrid {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut data = vec![0u8; (width * height * 3) as usize];
    rng.fill_bytes(&mut data);
    PixelGrid::new(width, height, 3, data).unwrap()
}

/// Flips the lowest addressed bit of the payload byte at `byte_index`.
fn flip_payload_bit(grid: &mut PixelGrid, depth: BitDepth, byte_index: usize) {
    let layout = Layout::new(grid, depth);
    let addr = layout.locate(HEADER_BITS + byte_index * 8).unwrap();
    let (x, y, channel) = (addr.x, addr.y, addr.channel);
    let value = grid.get(x, y, channel).unwrap() ^ (1 << addr.bit);
    let mut data = grid.clone().into_raw();
    data[layout.offset(&addr)] = value;
    *grid = PixelGrid::new(grid.width(), grid.height(), grid.channels(), data).unwrap();
}

#[test]
fn test_roundtrip_all_depths_and_modes() {
    let grid = create_test_grid(120, 120, 3);
    let mut rng = ChaCha20Rng::seed_from_u64(42);

    for depth in BitDepth::ALL {
        for (compress, encrypt) in [(false, false), (true, false), (false, true), (true, true)] {
            let len = rng.gen_range(0..1500);
            let mut payload = vec![0u8; len];
            rng.fill_bytes(&mut payload);

            let k = if encrypt { key() } else { None };
            let stego = embed(&grid, &payload, k, depth, compress).unwrap();
            let recovered = extract(&stego, k).unwrap();
            assert_eq!(
                recovered, payload,
                "depth={depth} compress={compress} encrypt={encrypt}"
            );
        }
    }
}

#[test]
fn test_roundtrip_at_exact_capacity() {
    let grid = create_noise_grid(64, 64, 7);
    for depth in BitDepth::ALL {
        let cap = capacity(&grid, depth);
        let payload: Vec<u8> = (0..cap).map(|i| (i * 97 % 256) as u8).collect();
        let stego = embed(&grid, &payload, None, depth, false).unwrap();
        assert_eq!(extract(&stego, None).unwrap(), payload);
    }
}

#[test]
fn test_concrete_capacity_scenario() {
    let grid = create_test_grid(100, 100, 3);
    let cap = capacity(&grid, BitDepth::ONE);
    assert_eq!(cap, (100 * 100 * 3 - HEADER_BITS) / 8);

    let fifty: Vec<u8> = (0..50).collect();
    let stego = embed(&grid, &fifty, None, BitDepth::ONE, false).unwrap();
    assert_eq!(extract(&stego, None).unwrap(), fifty);

    let too_big = vec![0x5A; cap + 1];
    assert_eq!(
        embed(&grid, &too_big, None, BitDepth::ONE, false),
        Err(StegoError::CapacityExceeded {
            required: cap + 1 + HEADER_LEN,
            available: cap + HEADER_LEN,
        })
    );
}

#[test]
fn test_overflow_leaves_grid_unchanged() {
    let mut grid = create_test_grid(50, 50, 3);
    let original = grid.clone();
    let payload = vec![0xFF; capacity(&grid, BitDepth::TWO) + 1];

    let result = Embedder::default().embed_in_place(&mut grid, &payload, None, BitDepth::TWO, false);

    assert!(matches!(result, Err(StegoError::CapacityExceeded { .. })));
    assert_eq!(grid, original);
}

#[test]
fn test_minimal_perturbation() {
    let grid = create_noise_grid(90, 90, 3);
    let payload: Vec<u8> = (0..2500).map(|i| (i * 53 % 256) as u8).collect();

    for depth in BitDepth::ALL {
        let stego = embed(&grid, &payload, key(), depth, false).unwrap();
        let report = quality::compare(&grid, &stego).unwrap();
        assert!(report.max_delta <= depth.mask(), "depth {depth}");

        for (a, b) in grid.as_raw().iter().zip(stego.as_raw()) {
            assert_eq!(a & !depth.mask(), b & !depth.mask());
        }
    }
}

#[test]
fn test_alpha_channel_never_touched() {
    let grid = create_test_grid(80, 80, 4);
    let payload = vec![0xC3; capacity(&grid, BitDepth::THREE)];
    let stego = embed(&grid, &payload, None, BitDepth::THREE, false).unwrap();

    for chunk in stego.as_raw().chunks(4) {
        assert_eq!(chunk[3], 255);
    }
    assert_eq!(extract(&stego, None).unwrap(), payload);
}

#[test]
fn test_grayscale_carrier() {
    let grid = PixelGrid::from_fn(64, 64, 1, |x, y, _| ((x ^ y) * 3) as u8).unwrap();
    let stego = embed(&grid, b"gray", key(), BitDepth::TWO, false).unwrap();
    assert_eq!(extract(&stego, key()).unwrap(), b"gray");
}

#[test]
fn test_foreign_grid_is_invalid_magic() {
    for seed in 0..5 {
        let grid = create_noise_grid(64, 64, seed);
        assert_eq!(extract(&grid, None), Err(StegoError::InvalidMagic));
    }
    assert_eq!(
        extract(&PixelGrid::filled(3, 3, 3, 0).unwrap(), None),
        Err(StegoError::InvalidMagic)
    );
}

#[test]
fn test_hello_world_with_key() {
    let grid = create_test_grid(100, 100, 3);
    let stego = embed(&grid, "hello world".as_bytes(), key(), BitDepth::ONE, false).unwrap();

    assert_eq!(extract(&stego, key()).unwrap(), b"hello world");
    assert!(matches!(
        extract(&stego, Some(&OTHER_KEY[..])),
        Err(StegoError::DecryptionError(_))
    ));
    assert!(matches!(
        extract(&stego, None),
        Err(StegoError::DecryptionError(_))
    ));
}

#[test]
fn test_tamper_encrypted_payload_fails_decryption() {
    let grid = create_test_grid(100, 100, 3);
    let original = embed(&grid, b"tamper-evident secret", key(), BitDepth::TWO, false).unwrap();
    let payload_len = read_header(&original).unwrap().payload_len as usize;

    for byte_index in [0, payload_len / 2, payload_len - 1] {
        let mut stego = original.clone();
        flip_payload_bit(&mut stego, BitDepth::TWO, byte_index);
        assert!(matches!(
            extract(&stego, key()),
            Err(StegoError::DecryptionError(_))
        ));
    }
}

#[test]
fn test_tamper_plain_payload_fails_checksum() {
    let grid = create_test_grid(100, 100, 3);
    let original = embed(&grid, b"plain but checked", None, BitDepth::ONE, false).unwrap();

    for byte_index in 0..17 {
        let mut stego = original.clone();
        flip_payload_bit(&mut stego, BitDepth::ONE, byte_index);
        assert_eq!(extract(&stego, None), Err(StegoError::ChecksumMismatch));
    }
}

#[test]
fn test_tamper_compressed_plain_payload_never_yields_wrong_plaintext() {
    let grid = create_test_grid(100, 100, 3);
    let secret = "plain but checked, and compressed. ".repeat(8);
    let original = embed(&grid, secret.as_bytes(), None, BitDepth::TWO, true).unwrap();
    let header = read_header(&original).unwrap();
    assert!(header.flags.compressed);
    assert!(!header.flags.encrypted);

    let layout = Layout::new(&original, BitDepth::TWO);
    let mut mismatches = 0;
    for bit in 0..header.payload_len as usize * 8 {
        let addr = layout.locate(HEADER_BITS + bit).unwrap();
        let mut data = original.clone().into_raw();
        data[layout.offset(&addr)] ^= 1 << addr.bit;
        let stego = PixelGrid::new(original.width(), original.height(), 3, data).unwrap();

        match extract(&stego, None) {
            Ok(plaintext) => assert_eq!(plaintext, secret.as_bytes(), "bit {bit}"),
            Err(e) => {
                assert_eq!(e, StegoError::ChecksumMismatch, "bit {bit}");
                mismatches += 1;
            }
        }
    }
    assert!(mismatches > 0);
}

#[test]
fn test_header_records_depth_not_caller() {
    let grid = create_test_grid(100, 100, 3);
    let stego = embed(&grid, b"depth three", None, BitDepth::THREE, false).unwrap();
    let header = read_header(&stego).unwrap();
    assert_eq!(header.bit_depth, BitDepth::THREE);
    assert_eq!(header.payload_len, 11);
    assert_eq!(extract(&stego, None).unwrap(), b"depth three");
}

#[test]
fn test_locate_is_pure() {
    let grid = create_test_grid(33, 17, 3);
    for depth in BitDepth::ALL {
        for i in (0..1000).step_by(37) {
            assert_eq!(locate(i, &grid, depth), locate(i, &grid, depth));
        }
    }
}

#[test]
fn test_worker_count_does_not_change_output() {
    let grid = create_noise_grid(200, 200, 11);
    let payload: Vec<u8> = (0..40_000).map(|i| (i % 241) as u8).collect();

    let configs = [
        EngineConfig::sequential(),
        EngineConfig {
            chunk_pixels: 8,
            min_parallel_bytes: 0,
            ..EngineConfig::default()
        },
        EngineConfig {
            chunk_pixels: 1000,
            min_parallel_bytes: 0,
            ..EngineConfig::default()
        },
    ];

    let reference = Embedder::new(configs[0].clone())
        .embed(&grid, &payload, None, BitDepth::THREE, false)
        .unwrap();
    for config in &configs {
        let stego = Embedder::new(config.clone())
            .embed(&grid, &payload, None, BitDepth::THREE, false)
            .unwrap();
        assert_eq!(stego, reference);
        assert_eq!(
            Extractor::new(config.clone()).extract(&stego, None).unwrap(),
            payload
        );
    }
}

#[test]
fn test_png_file_roundtrip_and_digest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stego.png");

    let grid = create_test_grid(128, 96, 3);
    let secret = "a longer secret message that compresses. ".repeat(20);
    let stego = embed(&grid, secret.as_bytes(), key(), BitDepth::TWO, true).unwrap();
    carrier::save(&stego, &path).unwrap();

    let hash_before = digest::digest_file(&path).unwrap();
    let reloaded = carrier::load(&path).unwrap();
    assert_eq!(extract(&reloaded, key()).unwrap(), secret.as_bytes());

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(digest::digest(&bytes), hash_before);
}

#[test]
fn test_jpeg_carrier_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("carrier.jpg");
    let grid = create_test_grid(32, 32, 3);
    carrier::to_image(&grid)
        .unwrap()
        .save_with_format(&path, image::ImageFormat::Jpeg)
        .unwrap();

    assert!(matches!(
        carrier::load(&path),
        Err(CarrierError::LossyFormat(_))
    ));
}
