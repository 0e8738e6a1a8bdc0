//! Normalization of mixed Persian/Arabic/English text into a canonical
//! token stream: only Persian letters, ASCII letters, and ASCII digits,
//! separated by single spaces.

/// Script membership of a single character, used to decide where a
/// transition space belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptClass {
    Persian,
    English,
    Digit,
    Unknown,
}

pub fn analyze(text: &str) -> String {
    let text = strip_bracketed(text);
    let text = substitute_characters(&text);
    let text = space_script_transitions(&text);
    let text = blank_invalid_characters(&text);
    collapse_whitespace(&text)
}

/// Drops everything between matching `[` and `]`, nesting included. The
/// brackets themselves are never emitted. A close without a matching open
/// leaves the depth at zero, so the text after it is kept.
pub fn strip_bracketed(text: &str) -> String {
    let mut depth = 0_usize;
    let mut kept = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => kept.push(character),
            _ => {}
        }
    }
    kept
}

pub fn substitute_characters(text: &str) -> String {
    let mut substituted = String::with_capacity(text.len());
    for character in text.chars() {
        match substitution(character) {
            Some(replacement) => substituted.push_str(replacement),
            None => substituted.push(character),
        }
    }
    substituted
}

fn substitution(character: char) -> Option<&'static str> {
    let replacement = match character {
        '\u{200c}' => " ", // half-space
        'آ' | 'أ' | 'إ' => "ا",
        'ؤ' => "و",
        'ة' => "ت",
        'ك' => "ک",
        'ى' | 'ي' | 'ئ' | 'ء' => "ی",
        'ھ' => "ه",
        'é' => "e",
        // Tanvins, short vowels, and shadda carry no tokenizable content.
        '\u{064b}'..='\u{0651}' => "",
        '۰' | '٠' => "0",
        '۱' | '١' => "1",
        '۲' | '٢' => "2",
        '۳' | '٣' => "3",
        '۴' | '٤' => "4",
        '۵' | '٥' => "5",
        '۶' | '٦' => "6",
        '۷' | '٧' => "7",
        '۸' | '٨' => "8",
        '۹' | '٩' => "9",
        _ => return None,
    };
    Some(replacement)
}

/// Inserts one space between adjacent characters of differing script
/// classes. Unknown characters are compatible with everything, so a
/// boundary only exists between two classified characters.
pub fn space_script_transitions(text: &str) -> String {
    let mut spaced = String::with_capacity(text.len());
    let mut characters = text.chars().peekable();
    while let Some(character) = characters.next() {
        spaced.push(character);
        if let Some(&next) = characters.peek() {
            if crosses_script_boundary(character, next) {
                spaced.push(' ');
            }
        }
    }
    spaced
}

fn crosses_script_boundary(left: char, right: char) -> bool {
    match (script_class(left), script_class(right)) {
        (ScriptClass::Unknown, _) | (_, ScriptClass::Unknown) => false,
        (left, right) => left != right,
    }
}

fn script_class(character: char) -> ScriptClass {
    if is_persian_letter(character) {
        ScriptClass::Persian
    } else if character.is_ascii_alphabetic() {
        ScriptClass::English
    } else if character.is_ascii_digit() {
        ScriptClass::Digit
    } else {
        ScriptClass::Unknown
    }
}

pub fn blank_invalid_characters(text: &str) -> String {
    text.chars()
        .map(|character| {
            if is_valid_character(character) {
                character
            } else {
                ' '
            }
        })
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_valid_character(character: char) -> bool {
    is_persian_letter(character)
        || is_native_digit(character)
        || character.is_ascii_alphanumeric()
}

fn is_persian_letter(character: char) -> bool {
    matches!(
        character,
        'ا' | 'ب'
            | 'پ'
            | 'ت'
            | 'ث'
            | 'ج'
            | 'چ'
            | 'ح'
            | 'خ'
            | 'د'
            | 'ذ'
            | 'ر'
            | 'ز'
            | 'ژ'
            | 'س'
            | 'ش'
            | 'ص'
            | 'ض'
            | 'ط'
            | 'ظ'
            | 'ع'
            | 'غ'
            | 'ف'
            | 'ق'
            | 'ک'
            | 'گ'
            | 'ل'
            | 'م'
            | 'ن'
            | 'و'
            | 'ه'
            | 'ی'
    )
}

fn is_native_digit(character: char) -> bool {
    matches!(character, '۰'..='۹' | '٠'..='٩')
}
