use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stego_crypt::codec::{
    capacity_bytes, decode_text, encode_text, hide, reveal, CodecOptions, FramingMode, Parallelism,
    PixelChannelStream, StegoError,
};

fn noisy_carrier(rng: &mut StdRng, width: u32, height: u32) -> PixelChannelStream {
    PixelChannelStream::new(RgbImage::from_fn(width, height, |_, _| Rgb(rng.gen())))
}

fn ascii(rng: &mut StdRng, len: usize) -> String {
    (0..len).map(|_| rng.gen_range(b' '..=b'~') as char).collect()
}

#[test]
fn test_ascii_round_trips_with_terminator() {
    let mut rng = StdRng::seed_from_u64(7);
    let options = CodecOptions::default();

    for len in [1, 2, 17, 200] {
        let original = noisy_carrier(&mut rng, 40, 25);
        let password = ascii(&mut rng, 1 + len % 9);
        let message = ascii(&mut rng, len);

        let mut stream = original.clone();
        encode_text(&mut stream, &password, &message, &options, None).unwrap();

        assert_eq!(decode_text(&stream, &password, &options, None).unwrap(), message);
        for (before, after) in original.channels().iter().zip(stream.channels()) {
            assert_eq!(before & !1, after & !1);
        }
    }
}

#[test]
fn test_arbitrary_bytes_round_trip_with_length_prefix() {
    let mut rng = StdRng::seed_from_u64(11);
    let options = CodecOptions {
        framing: FramingMode::LengthPrefixed,
        ..CodecOptions::default()
    };

    for len in [1, 64, 500] {
        let mut stream = noisy_carrier(&mut rng, 64, 64);
        let password: Vec<u8> = (0..5).map(|_| rng.gen()).collect();
        let mut message = vec![0u8; len];
        rng.fill(&mut message[..]);
        // Worst case for the terminator framing: the marker itself.
        message[0] = 0xff;
        if len > 1 {
            message[1] = 0xfe;
        }

        hide(&mut stream, &password, &message, &options, None).unwrap();
        assert_eq!(reveal(&stream, &password, &options, None).unwrap(), message);
    }
}

#[test]
fn test_parallel_chunks_decode_the_same() {
    let mut rng = StdRng::seed_from_u64(3);
    let message = ascii(&mut rng, 4000);
    let pooled = CodecOptions {
        parallelism: Parallelism {
            threshold: 0,
            chunk_size: 1000,
        },
        ..CodecOptions::default()
    };
    let sequential = CodecOptions {
        parallelism: Parallelism::sequential(),
        ..CodecOptions::default()
    };

    let original = noisy_carrier(&mut rng, 120, 100);
    let mut a = original.clone();
    let mut b = original;
    encode_text(&mut a, "swordfish", &message, &pooled, None).unwrap();
    encode_text(&mut b, "swordfish", &message, &sequential, None).unwrap();

    assert_eq!(a.channels(), b.channels());
    assert_eq!(decode_text(&a, "swordfish", &sequential, None).unwrap(), message);
    assert_eq!(decode_text(&b, "swordfish", &pooled, None).unwrap(), message);
}

#[test]
fn test_capacity_boundary_on_larger_carrier() {
    let mut rng = StdRng::seed_from_u64(5);
    // 120 pixels = 360 bits = 43 message bytes + terminator, 8 bits spare.
    let fits = capacity_bytes(360, FramingMode::Terminator);
    assert_eq!(fits, 43);

    let original = noisy_carrier(&mut rng, 12, 10);
    let mut stream = original.clone();
    encode_text(&mut stream, "k", &"x".repeat(fits), &CodecOptions::default(), None).unwrap();
    assert_eq!(decode_text(&stream, "k", &CodecOptions::default(), None).unwrap(), "x".repeat(fits));

    let mut stream = original.clone();
    let err = encode_text(&mut stream, "k", &"x".repeat(fits + 1), &CodecOptions::default(), None).unwrap_err();
    assert_eq!(err, StegoError::CapacityExceeded { required: 368, available: 360 });
    assert_eq!(stream.channels(), original.channels());
}

#[test]
fn test_wrong_password_vectors() {
    let options = CodecOptions::default();
    let cases = [
        ("key", "yek", "hi"),
        ("correct horse", "battery staple", "the eagle has landed"),
        ("a", "b", "single key byte"),
    ];

    for (right, wrong, message) in cases {
        let mut stream = PixelChannelStream::new(RgbImage::from_pixel(30, 30, Rgb([10, 20, 30])));
        encode_text(&mut stream, right, message, &options, None).unwrap();

        let recovered = decode_text(&stream, wrong, &options, None);
        assert_ne!(recovered, Ok(message.to_string()));
    }
}

#[test]
fn test_unrelated_image_has_nothing_to_decode() {
    let options = CodecOptions::default();
    let flat = PixelChannelStream::new(RgbImage::from_pixel(50, 50, Rgb([200, 120, 64])));
    assert_eq!(decode_text(&flat, "key", &options, None), Err(StegoError::TerminatorNotFound));

    let odd = PixelChannelStream::new(RgbImage::from_pixel(50, 50, Rgb([201, 121, 65])));
    assert_eq!(decode_text(&odd, "key", &options, None), Err(StegoError::TerminatorNotFound));
}

#[test]
fn test_unrelated_image_has_nothing_to_decode_with_length_prefix() {
    let options = CodecOptions {
        framing: FramingMode::LengthPrefixed,
        ..CodecOptions::default()
    };

    // Even channels read as a zero-length header.
    let flat = PixelChannelStream::new(RgbImage::from_pixel(50, 50, Rgb([200, 120, 64])));
    assert_eq!(decode_text(&flat, "key", &options, None), Err(StegoError::TerminatorNotFound));

    // Odd channels read as a header far larger than the carrier.
    let odd = PixelChannelStream::new(RgbImage::from_pixel(50, 50, Rgb([201, 121, 65])));
    assert!(matches!(
        decode_text(&odd, "key", &options, None),
        Err(StegoError::TruncatedPayload { .. })
    ));
}

#[test]
fn test_terminator_at_first_bit_is_not_a_message() {
    // Five odd pixels give fifteen one-bits, the even sixth pixel the zero.
    let stream = PixelChannelStream::new(RgbImage::from_fn(10, 10, |x, y| {
        if y == 0 && x < 5 {
            Rgb([201, 121, 65])
        } else {
            Rgb([200, 120, 64])
        }
    }));

    assert_eq!(
        decode_text(&stream, "key", &CodecOptions::default(), None),
        Err(StegoError::TerminatorNotFound)
    );
}

#[test]
fn test_framing_modes_are_not_interchangeable() {
    let mut stream = PixelChannelStream::new(RgbImage::from_pixel(20, 20, Rgb([0, 0, 0])));
    let terminator = CodecOptions::default();
    let prefixed = CodecOptions {
        framing: FramingMode::LengthPrefixed,
        ..CodecOptions::default()
    };

    encode_text(&mut stream, "key", "hello", &prefixed, None).unwrap();

    // The header is 5 as a u32 and the zero carrier holds no terminator.
    assert_eq!(decode_text(&stream, "key", &terminator, None), Err(StegoError::TerminatorNotFound));
}
