pub mod admin;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Commandes disponibles :")]
pub enum Command {
    #[command(description = "Choisir un service et passer commande")]
    Start,
    #[command(description = "Annuler la commande en cours")]
    Cancel,
    #[command(description = "Vérifier que le bot répond")]
    Status,
    #[command(description = "Afficher cette aide")]
    Help,
    #[command(description = "(admin) Envoyer le tutoriel à un utilisateur")]
    SendTutorial(String),
}
