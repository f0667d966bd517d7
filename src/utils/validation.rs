use anyhow::{anyhow, Result};

const MAX_COUNTRY_LEN: usize = 56;
const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;

/// Trims and checks a free-text country answer.
pub fn validate_country(country: &str) -> Result<String> {
    let country = country.trim();

    if country.is_empty() {
        return Err(anyhow!("Country cannot be empty"));
    }

    if country.chars().count() > MAX_COUNTRY_LEN {
        return Err(anyhow!("Country cannot be longer than {} characters", MAX_COUNTRY_LEN));
    }

    if country.contains('\n') || country.contains('\r') {
        return Err(anyhow!("Country cannot contain line breaks"));
    }

    if country.starts_with('/') {
        return Err(anyhow!("Country looks like a command"));
    }

    Ok(country.to_string())
}

/// Normalizes a WhatsApp number to `+` followed by digits (E.164 length).
///
/// Spaces, dots, dashes and parentheses are dropped; a leading `00` is
/// read as `+`.
pub fn normalize_whatsapp_number(input: &str) -> Result<String> {
    let input = input.trim();

    if input.is_empty() {
        return Err(anyhow!("WhatsApp number cannot be empty"));
    }

    let mut digits = String::with_capacity(input.len());
    for (i, c) in input.chars().enumerate() {
        match c {
            '0'..='9' => digits.push(c),
            '+' if i == 0 => {}
            ' ' | '.' | '-' | '(' | ')' => {}
            _ => return Err(anyhow!("WhatsApp number contains invalid character '{}'", c)),
        }
    }

    let digits = if !input.starts_with('+') {
        digits.strip_prefix("00").map(str::to_string).unwrap_or(digits)
    } else {
        digits
    };

    if digits.len() < MIN_PHONE_DIGITS {
        return Err(anyhow!("WhatsApp number is too short"));
    }

    if digits.len() > MAX_PHONE_DIGITS {
        return Err(anyhow!("WhatsApp number is too long"));
    }

    Ok(format!("+{digits}"))
}

pub fn validate_telegram_user_id(user_id: i64) -> Result<()> {
    // Private chats with users always have a positive id
    if user_id <= 0 {
        return Err(anyhow!("Telegram user ID must be positive"));
    }

    Ok(())
}

/// Parses the argument of `/sendtutorial`.
pub fn parse_user_id_arg(arg: &str) -> Result<i64> {
    let arg = arg.trim();

    if arg.is_empty() {
        return Err(anyhow!("Missing Telegram user ID"));
    }

    let user_id: i64 = arg
        .parse()
        .map_err(|_| anyhow!("'{}' is not a valid Telegram user ID", arg))?;
    validate_telegram_user_id(user_id)?;

    Ok(user_id)
}

/// Parses a comma-separated list of admin ids, ignoring blank entries.
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| anyhow!("'{}' is not a valid user ID", s))
        })
        .collect()
}
