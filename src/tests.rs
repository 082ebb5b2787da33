use crate::{
    DecodeError, Dictionary, DictionaryRegistry, NAME, NAME_NO_PAD, STANDARD, STANDARD_ALPHABET,
    STANDARD_NO_PAD, decode, encode,
};

fn get_dictionary(name: &str) -> Dictionary {
    DictionaryRegistry::load_default()
        .unwrap()
        .dictionary(name)
        .unwrap()
}

// (decoded, encoded with STANDARD)
const PAIRS: &[(&[u8], &str)] = &[
    // Revival passwords
    (
        b"\x10\xaf\x91\x55\x97\x6b\xbe\xfd\xba\xf8\x21\x8a\x38\xa5\x59",
        "おさべつにはほわげげだどべうきさそさには",
    ),
    (
        b"\x14\x9f\x50\x51\x87\x2a\xba\xef\x41\x14\x93\x51\x55\x17\x20",
        "かこぶちなのへろぐぐぶいかこせつにつへむ",
    ),
    (
        b"\x20\xd0\x54\x61\xcc\x3e\x08\x24\x55\x65\xd8\x65\xa6\x5c\x34",
        "けせいなのへごべううつにはほめよれよごぜ",
    ),
    (
        b"\x25\x01\x17\x6d\xfc\xc1\x14\x53\x10\x51\x87\x20\x92\x0a\xef",
        "こちおねふみずいかかすちなのへむゆむわげ",
    ),
    (
        b"\x92\x87\x0f\x4d\x76\xe9\xb6\xdd\x38\xf0\x01\x08\x30\x84\xd7",
        "ゆるへたとねふれぎぎぜづびあおけすけとね",
    ),
    (
        b"\x96\xb7\xd2\x59\xa7\xac\xc3\x0f\xc3\x1c\xb3\xd3\x5d\x37\xa2",
        "よわみてぬひまがごごぼえくしたとねとまも",
    ),
    (
        b"\xa2\xf8\xd6\x69\xec\x80\x10\x44\xd7\x6d\xf8\xe7\xae\x7c\xb6",
        "るげやぬひまじあおおとねふみやりわりじだ",
    ),
    (
        b"\xa6\xe8\x95\x65\xdc\x7f\x0c\x32\x8e\x49\x66\x9e\x89\xea\x6d",
        "れぐもにはほざぼええさそてぬひまもまれぎ",
    ),
    // RFC 3548 examples
    (b"\x14\xfb\x9c\x03\xd9\x7e", "かたぐへあぶよべ"),
    (b"\x14\xfb\x9c\x03\xd9", "かたぐへあぶゆ・"),
    (b"\x14\xfb\x9c\x03", "かたぐへあご・・"),
    // RFC 4648 examples
    (b"", ""),
    (b"f", "はむ・・"),
    (b"fo", "はらび・"),
    (b"foo", "はらぶげ"),
    (b"foob", "はらぶげのむ・・"),
    (b"fooba", "はらぶげのらお・"),
    (b"foobar", "はらぶげのらかじ"),
    // Wikipedia examples
    (b"sure.", "へぢにじはてづ・"),
    (b"sure", "へぢにじはち・・"),
    (b"sur", "へぢにじ"),
    (b"su", "へぢな・"),
    (b"leasure.", "ふきにめへぢにじはてづ・"),
    (b"easure.", "はぬかずほねこよしむ・・"),
    (b"asure.", "のねせぞへらなぐ"),
    // Misc
    (b"Hello, world!", "てきにがふきびがけくほげへらざゆけち・・"),
    (b"any + old & data", "のぬででけうがむふだざゆけうのむはきかぜのち・・"),
    (b"foo\x00bar", "はらぶげあきこめへむ・・"),
];

const BIGTEST: (&[u8], &str) = (
    b"Twas brillig, and the slithy toves",
    "にくほめへじいもへらよがふきよりしういめふらちむほきめよけくせがひねつるまていぜふぢはよへご・・",
);

fn padded(encoded: &str) -> String {
    encoded.to_string()
}

fn raw(encoded: &str) -> String {
    encoded.trim_end_matches('・').to_string()
}

/// The four configurations every vector must hold for, with the matching
/// form of the expected text.
fn configurations() -> Vec<(Dictionary, fn(&str) -> String)> {
    let padded: fn(&str) -> String = padded;
    let raw: fn(&str) -> String = raw;
    vec![
        (STANDARD.clone(), padded),
        (STANDARD_NO_PAD.clone(), raw),
        (STANDARD.with_strict(), padded),
        (STANDARD_NO_PAD.with_strict(), raw),
    ]
}

#[test]
fn test_encode_vectors() {
    for (decoded, encoded) in PAIRS {
        for (dictionary, conv) in configurations() {
            assert_eq!(
                dictionary.encode(decoded),
                conv(encoded),
                "encode {:?}",
                decoded
            );
        }
    }
}

#[test]
fn test_decode_vectors() {
    for (decoded, encoded) in PAIRS {
        for (dictionary, conv) in configurations() {
            assert_eq!(
                dictionary.decode(conv(encoded)).unwrap(),
                *decoded,
                "decode {:?}",
                encoded
            );
        }
    }
}

#[test]
fn test_big_vector() {
    let (decoded, encoded) = BIGTEST;
    assert_eq!(encode(decoded, &STANDARD), encoded);
    assert_eq!(decode(encoded, &STANDARD).unwrap(), decoded);
}

#[test]
fn test_utf8_message() {
    let msg = "Hello, 世界";
    let encoded = STANDARD.encode(msg);
    assert_eq!(encoded, "てきにがふきびがけそてづよぐまにやあ・・");
    assert_eq!(String::from_utf8(STANDARD.decode(&encoded).unwrap()).unwrap(), msg);

    assert_eq!(
        STANDARD
            .decode("へだぶぎはていゆのねつめけくほれほきむむあういめふらちむばばぐぼ")
            .unwrap(),
        "some data with \x00 and \u{feff}".as_bytes()
    );
}

/// Rewrites ASCII base64 text symbol-for-symbol into the STANDARD alphabet.
fn substitute(base64: &Dictionary, ascii: &str) -> String {
    ascii
        .chars()
        .map(|c| match base64.value_of(c) {
            Some(value) => STANDARD.symbol(value).unwrap_or_default().to_string(),
            None => {
                assert_eq!(c, '=');
                "・".to_string()
            }
        })
        .collect()
}

#[test]
fn test_matches_ascii_base64_under_substitution() {
    let base64 = get_dictionary("base64");
    assert_eq!(base64.encode(b"foobar"), "Zm9vYmFy");
    assert_eq!(base64.encode(b"fooba"), "Zm9vYmE=");

    let mut inputs: Vec<Vec<u8>> = PAIRS.iter().map(|(d, _)| d.to_vec()).collect();
    inputs.push((0..=255).collect());
    inputs.push(BIGTEST.0.to_vec());

    for data in inputs {
        let ascii = base64.encode(&data);
        assert_eq!(STANDARD.encode(&data), substitute(&base64, &ascii));
        assert_eq!(base64.decode(&ascii).unwrap(), data);
    }
}

#[test]
fn test_decode_corrupt() {
    // (input, offset of the first problem, or None when valid)
    let cases: &[(&str, Option<usize>)] = &[
        ("", None),
        ("\n", None),
        ("あああ・\n", None),
        ("ああああ\n", None),
        ("！！！！", Some(0)),
        ("・・・・", Some(0)),
        ("が・・・", Some("が".len())),
        ("・あああ", Some(0)),
        ("あ・ああ", Some("あ".len())),
        ("ああ・あ", Some("ああ".len())),
        ("ああ・・あ", Some("ああ・・".len())),
        ("あああ・ああああ", Some("あああ・".len())),
        ("あ", Some(0)),
        ("あああああ", Some("ああああ".len())),
        ("あああああああああ", Some("ああああああああ".len())),
        ("ああああああ", Some("ああああ".len())),
        ("あ・", Some("あ".len())),
        ("あ・・", Some("あ".len())),
        ("ああ・", Some("ああ・".len())),
        ("ああ・・", None),
        ("あああ・", None),
        ("ああああ", None),
        ("ああああああ・", Some("ああああああ・".len())),
        ("ふるいけやか・・・・・", Some("ふるいけやか・・".len())),
        ("あ！\n", Some("あ".len())),
        ("あ・\n", Some("あ".len())),
    ];

    for &(input, offset) in cases {
        let result = STANDARD.decode(input);
        match offset {
            None => assert!(result.is_ok(), "wrongly rejected {:?}", input),
            Some(offset) => assert_eq!(
                result,
                Err(DecodeError::CorruptInput {
                    offset: offset as u64
                }),
                "input {:?}",
                input
            ),
        }
    }
}

#[test]
fn test_newlines_after_padding() {
    assert_eq!(STANDARD.decode("はら\nび・\r\n").unwrap(), b"fo");
    assert_eq!(STANDARD.decode("はむ・\n・\n").unwrap(), b"f");
    // a newline is never counted as padding
    assert_eq!(
        STANDARD.decode("はら・\n"),
        Err(DecodeError::CorruptInput {
            offset: "はら・\n".len() as u64
        })
    );
}

#[test]
fn test_strict_rejects_slack_bits() {
    // 'め' is 33: "はめ" carries four stray low bits
    assert_eq!(STANDARD.decode("はめ・・").unwrap(), b"f");
    assert_eq!(
        STANDARD.with_strict().decode("はめ・・"),
        Err(DecodeError::CorruptInput {
            offset: "はめ".len() as u64
        })
    );
    assert_eq!(
        STANDARD_NO_PAD.with_strict().decode("はめ"),
        Err(DecodeError::CorruptInput {
            offset: "はめ".len() as u64
        })
    );
}

#[test]
fn test_unpadded_rejects_padding() {
    assert_eq!(
        STANDARD_NO_PAD.decode("はむ・・"),
        Err(DecodeError::CorruptInput {
            offset: "はむ".len() as u64
        })
    );
    assert_eq!(
        STANDARD_NO_PAD.decode("はらぶげの"),
        Err(DecodeError::CorruptInput {
            offset: "はらぶげの".len() as u64
        })
    );
}

#[test]
fn test_encoded_len() {
    let emoji = &get_dictionary("emoji");
    let std = &*STANDARD;
    let std_raw = &*STANDARD_NO_PAD;
    let cases: &[(&Dictionary, usize, usize)] = &[
        // hiragana are 3 bytes each
        (std_raw, 0, 0),
        (std_raw, 1, 2 * 3),
        (std_raw, 2, 3 * 3),
        (std_raw, 3, 4 * 3),
        (std_raw, 7, 10 * 3),
        (std, 0, 0),
        (std, 1, 4 * 3),
        (std, 2, 4 * 3),
        (std, 3, 4 * 3),
        (std, 4, 8 * 3),
        (std, 7, 12 * 3),
        // emoji are 4 bytes each
        (emoji, 0, 0),
        (emoji, 1, 4 * 4),
        (emoji, 2, 4 * 4),
        (emoji, 3, 4 * 4),
        (emoji, 4, 8 * 4),
        (emoji, 7, 12 * 4),
    ];
    for &(dictionary, n, want) in cases {
        assert_eq!(dictionary.encoded_len(n), Some(want), "n = {}", n);
    }
}

#[test]
fn test_encoded_len_is_an_upper_bound() {
    let mut alphabet: String = STANDARD_ALPHABET.chars().take(63).collect();
    alphabet.push('A');
    let mixed = Dictionary::new(&alphabet).unwrap();
    let data = [0xFFu8; 10];
    let encoded = mixed.encode(data);
    assert!(encoded.len() <= mixed.encoded_len(data.len()).unwrap());
    assert_eq!(mixed.decode(&encoded).unwrap(), data);
}

#[test]
fn test_padding_determinism() {
    for len in 0..12usize {
        let data = vec![0xA5u8; len];
        let encoded = STANDARD.encode(&data);
        let pads = encoded.chars().rev().take_while(|&c| c == '・').count();
        assert_eq!(pads, (3 - len % 3) % 3, "len {}", len);
    }
}

#[test]
fn test_name_dictionary() {
    let data = b"\x00\x10\x83\x10\x51\x87\x20\x92\x8b";
    let encoded = NAME.encode(data);
    assert!(encoded.starts_with("０１２３"));
    assert_eq!(NAME.decode(&encoded).unwrap(), data);
    // 'f' is 25, 32
    assert_eq!(NAME_NO_PAD.encode(b"f"), "たぬ");
    assert_eq!(NAME.encode(b"f"), "たぬ・・");
}

#[test]
fn test_empty_input() {
    for dictionary in [&*STANDARD, &*STANDARD_NO_PAD, &*NAME] {
        assert_eq!(dictionary.encode(b""), "");
        assert_eq!(dictionary.decode(b"").unwrap(), b"");
    }
}

#[test]
fn test_with_padding_twice_is_idempotent() {
    let once = STANDARD.with_padding(Some('＝')).unwrap();
    let twice = once.with_padding(Some('＝')).unwrap();
    assert_eq!(once.encode(b"fo"), twice.encode(b"fo"));
    assert_eq!(twice.encode(b"fo"), "はらび＝");
    assert!(once.with_strict().with_strict().is_strict());
}

#[test]
fn test_unpadded_builtins() {
    assert_eq!(STANDARD_NO_PAD.padding(), None);
    assert_eq!(NAME_NO_PAD.padding(), None);
    assert_eq!(STANDARD_NO_PAD.alphabet(), STANDARD.alphabet());
    assert_eq!(NAME_NO_PAD.alphabet(), NAME.alphabet());
}
