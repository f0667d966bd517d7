//! User-facing messages. The audience is French-speaking, so the copy is too.

use crate::database::models::Service;

pub const PRIVATE_ONLY: &str = "🔒 Écris-moi en privé pour passer une commande.";
pub const START: &str = "👋 Bienvenue ! Choisissez la plateforme à monétiser :";
pub const ASK_COUNTRY: &str = "🌍 Dans quel pays êtes-vous ?";
pub const ASK_WHATSAPP: &str =
    "📞 Envoie ton numéro WhatsApp (format international, ex: +22570xxxxxxx) :";
pub const INVALID_COUNTRY: &str = "⚠️ Pays invalide. Indique simplement le nom de ton pays :";
pub const INVALID_WHATSAPP: &str =
    "⚠️ Numéro invalide. Utilise le format international, ex: +22570xxxxxxx :";
pub const AFTER_PAYMENT: &str =
    "🔔 Après paiement, Paystack redirigera automatiquement vers la vidéo tutoriel (et le bot confirmera).";
pub const ADMIN_NOTE: &str = "🔰 Vous êtes admin : accès direct au tutoriel.";
pub const PAY_ERROR: &str = "❌ Impossible de générer le lien de paiement. Contactez le support.";
pub const CANCEL: &str = "❌ Commande annulée. Tape /start pour recommencer.";
pub const THANKS_AUTO: &str = "✅ Paiement confirmé. Voici le tutoriel :";
pub const UNKNOWN_OPTION: &str = "Option inconnue.";
pub const GENERIC_ERROR: &str = "❌ Une erreur est survenue. Tape /start pour recommencer.";
pub const IDLE_HINT: &str = "ℹ️ Tape /start pour passer une commande.";
pub const UNKNOWN_COMMAND: &str = "Commande inconnue. Tape /help pour la liste des commandes.";
pub const RESTART_HINT: &str = "Ce menu a expiré. Tape /start pour recommencer.";
pub const STATUS_OK: &str = "Bot actif ✅";
pub const ADMIN_ONLY: &str = "Commande réservée aux admins.";
pub const SEND_TUTORIAL_USAGE: &str = "Usage: /sendtutorial <telegram_user_id>";
pub const TUTORIAL_SENT: &str = "Tutoriel envoyé.";
pub const TUTORIAL_NOT_CONFIGURED: &str = "TUTORIAL_LINK non configuré.";
pub const SEND_ERROR: &str = "Erreur lors de l'envoi.";

pub const BUTTON_HOW_IT_WORKS: &str = "ℹ️ Comment ça marche";
pub const BUTTON_SUPPORT: &str = "📞 Contacter Support";
pub const BUTTON_SUPPORT_SHORT: &str = "Contacter support";
pub const BUTTON_PAY: &str = "💳 Payer maintenant";
pub const BUTTON_CANCEL: &str = "❌ Annuler";

/// Placeholder for order details the bot no longer has.
pub const NOT_AVAILABLE: &str = "N/A";

pub fn service_button(service: Service) -> String {
    match service {
        Service::TikTok => "🎬 Monétiser TikTok".to_string(),
        Service::Facebook => "📘 Monétiser Facebook".to_string(),
    }
}

pub fn price(service: Service, amount: u64) -> String {
    format!("💰 Prix {} : {} F CFA.", service.display_name(), amount)
}

pub fn checkout(service: Service, amount: u64) -> String {
    format!("{}\n\n{}", price(service, amount), AFTER_PAYMENT)
}

pub fn tutorial(link: &str) -> String {
    format!("Voici le tutoriel :\n{link}")
}

pub fn payment_confirmed(tutorial_link: Option<&str>) -> String {
    match tutorial_link {
        Some(link) => format!("{THANKS_AUTO}\n{link}"),
        None => THANKS_AUTO.to_string(),
    }
}

pub fn admin_payment_notice(
    user_id: i64,
    service: &str,
    reference: &str,
    country: Option<&str>,
    whatsapp: Option<&str>,
) -> String {
    format!(
        "🎉 PAIEMENT CONFIRMÉ\n• Utilisateur: {}\n• Service: {}\n• Réf: {}\n• Pays: {}\n• WhatsApp: {}",
        user_id,
        service,
        reference,
        country.unwrap_or(NOT_AVAILABLE),
        whatsapp.unwrap_or(NOT_AVAILABLE),
    )
}
