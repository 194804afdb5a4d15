use whatlang::{Lang, detect};

const MIN_CONFIDENCE: f64 = 0.5;
const MIN_TEXT_LENGTH: usize = 50;

/// ISO 639-1 code of `text`, when whatlang is confident about it.
pub fn detect_language(text: &str) -> Option<&'static str> {
    // Short snippets (captions, names) are too ambiguous to trust
    if text.trim().chars().count() < MIN_TEXT_LENGTH {
        return None;
    }

    let info = detect(text)?;
    if info.confidence() < MIN_CONFIDENCE {
        return None;
    }
    lang_to_code(info.lang())
}

/// `true` when `text` is confidently detected as `code` (ISO 639-1).
pub fn is_language(text: &str, code: &str) -> bool {
    detect_language(text).is_some_and(|detected| detected.eq_ignore_ascii_case(code))
}

fn lang_to_code(lang: Lang) -> Option<&'static str> {
    let code = match lang {
        Lang::Eng => "en",
        Lang::Rus => "ru",
        Lang::Cmn => "zh",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Nld => "nl",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Fin => "fi",
        Lang::Heb => "he",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Tha => "th",
        Lang::Vie => "vi",
        Lang::Ukr => "uk",
        Lang::Ind => "id",
        Lang::Ell => "el",
        _ => return None,
    };
    Some(code)
}
