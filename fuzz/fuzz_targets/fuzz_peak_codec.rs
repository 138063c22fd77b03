#![no_main]

use libfuzzer_sys::fuzz_target;
use peakstore::codec::{CodecConfig, Compression, PeakCodec, Precision, TextEncoding};

fuzz_target!(|data: &[u8]| {
    // First byte picks the configuration, the next eight the declared count,
    // the rest is the encoded array. Decoding must either succeed or fail
    // with an error, never panic.
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Some((count, payload)) = rest.split_first_chunk::<8>() else {
        return;
    };
    let count = u64::from_le_bytes(*count);
    let expected_count = if selector & 8 == 0 { (count & 0xff) as usize } else { count as usize };

    let config = CodecConfig::new(expected_count)
        .with_precision(if selector & 1 == 0 { Precision::Float32 } else { Precision::Float64 })
        .with_compression(if selector & 2 == 0 { Compression::None } else { Compression::Zlib })
        .with_text(if selector & 4 == 0 { TextEncoding::Raw } else { TextEncoding::Base64 });

    let _ = PeakCodec::decode::<f64>(payload, &config);
    let _ = PeakCodec::decode_reader::<f32, _>(payload, &config);
});
