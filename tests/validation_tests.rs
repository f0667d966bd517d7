use monetization_bot::database::models::Service;
use monetization_bot::utils::validation::*;

#[test]
fn test_validate_country() {
    assert_eq!(validate_country("  Sénégal ").unwrap(), "Sénégal");
    assert_eq!(validate_country("Côte d'Ivoire").unwrap(), "Côte d'Ivoire");

    assert!(validate_country("").is_err());
    assert!(validate_country("   ").is_err());
    assert!(validate_country("/start").is_err());
    assert!(validate_country("Bénin\nTogo").is_err());
    assert!(validate_country(&"a".repeat(57)).is_err());
    assert!(validate_country(&"é".repeat(56)).is_ok());
}

#[test]
fn test_normalize_whatsapp_number() {
    assert_eq!(normalize_whatsapp_number("+225 07 00 00 00 00").unwrap(), "+2250700000000");
    assert_eq!(normalize_whatsapp_number("+1 (555) 010-9999").unwrap(), "+15550109999");
    assert_eq!(normalize_whatsapp_number("00221.77.123.45.67").unwrap(), "+221771234567");
    assert_eq!(normalize_whatsapp_number("2250700000000").unwrap(), "+2250700000000");
}

#[test]
fn test_normalize_whatsapp_number_rejects_garbage() {
    assert!(normalize_whatsapp_number("").is_err());
    assert!(normalize_whatsapp_number("call me").is_err());
    assert!(normalize_whatsapp_number("+225 07+00").is_err());
    assert!(normalize_whatsapp_number("1234567").is_err());
    assert!(normalize_whatsapp_number("+1234567890123456").is_err());
}

#[test]
fn test_parse_user_id_arg() {
    assert_eq!(parse_user_id_arg(" 123456 ").unwrap(), 123456);

    assert!(parse_user_id_arg("").is_err());
    assert!(parse_user_id_arg("abc").is_err());
    assert!(parse_user_id_arg("-100123").is_err());
    assert!(parse_user_id_arg("0").is_err());
}

#[test]
fn test_parse_admin_ids() {
    assert_eq!(parse_admin_ids("").unwrap(), Vec::<i64>::new());
    assert_eq!(parse_admin_ids("1, 2 ,3,").unwrap(), vec![1, 2, 3]);
    assert!(parse_admin_ids("1,x").is_err());
}

#[test]
fn test_service_parsing() {
    assert_eq!("tiktok".parse::<Service>().unwrap(), Service::TikTok);
    assert_eq!(" Facebook ".parse::<Service>().unwrap(), Service::Facebook);
    assert!("instagram".parse::<Service>().is_err());
    assert_eq!(Service::TikTok.to_string(), "tiktok");
}
