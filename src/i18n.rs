//! Translation tables for the opt-in dialog.
//!
//! Lookups are keyed by the English source string, mirroring how the
//! dialog resolves its default texts. Unknown languages and unknown
//! strings fall back to the source string unchanged.

/// English source strings used as lookup keys.
pub const DEFAULT_TITLE: &str = "Would you like to subscribe to push notifications?";
pub const DEFAULT_MESSAGE: &str = "You can always unsubscribe at any time.";
pub const DEFAULT_POSITIVE: &str = "Subscribe";
pub const DEFAULT_NEGATIVE: &str = "Later";
pub const ATTRIBUTION: &str = "Notifications by optin-prompt";

type Table = &'static [(&'static str, &'static str)];

const FR: Table = &[
    (DEFAULT_TITLE, "Souhaitez-vous vous inscrire aux notifications?"),
    (DEFAULT_MESSAGE, "Vous pouvez vous désinscrire à tout moment."),
    (DEFAULT_POSITIVE, "Je m'inscris"),
    (DEFAULT_NEGATIVE, "Plus tard"),
    (ATTRIBUTION, "Notifications par optin-prompt"),
];

const ES: Table = &[
    (DEFAULT_TITLE, "¿Desea suscribirse a las notificaciones push?"),
    (DEFAULT_MESSAGE, "Siempre puede darse de baja en cualquier momento"),
    (DEFAULT_POSITIVE, "Me suscribo"),
    (DEFAULT_NEGATIVE, "Más tarde"),
    (ATTRIBUTION, "Notificaciones por optin-prompt"),
];

const IT: Table = &[
    (DEFAULT_TITLE, "Vuoi iscriverti alle notifiche push?"),
    (DEFAULT_MESSAGE, "Puoi annullare l'iscrizione in qualsiasi momento"),
    (DEFAULT_POSITIVE, "Mi iscrivo"),
    (DEFAULT_NEGATIVE, "Più tardi"),
    (ATTRIBUTION, "Notifiche di optin-prompt"),
];

const DE: Table = &[
    (DEFAULT_TITLE, "Möchten Sie Push-Benachrichtigungen abonnieren?"),
    (DEFAULT_MESSAGE, "Sie können sich jederzeit abmelden."),
    (DEFAULT_POSITIVE, "Abonnieren"),
    (DEFAULT_NEGATIVE, "Später"),
    (ATTRIBUTION, "Benachrichtigungen von optin-prompt"),
];

const PT: Table = &[
    (DEFAULT_TITLE, "Deseja se inscrever para receber notificações?"),
    (DEFAULT_MESSAGE, "Você pode cancelar a qualquer momento."),
    (DEFAULT_POSITIVE, "Inscrever-se"),
    (DEFAULT_NEGATIVE, "Mais tarde"),
    (ATTRIBUTION, "Notificações por optin-prompt"),
];

const NL: Table = &[
    (DEFAULT_TITLE, "Wilt u zich abonneren op pushmeldingen?"),
    (DEFAULT_MESSAGE, "U kunt zich altijd op elk gewenst moment afmelden."),
    (DEFAULT_POSITIVE, "Abonneren"),
    (DEFAULT_NEGATIVE, "Later"),
];

const PL: Table = &[
    (DEFAULT_TITLE, "Czy chcesz subskrybować powiadomienia push?"),
    (
        DEFAULT_MESSAGE,
        "Zawsze możesz zrezygnować z subskrypcji w dowolnym momencie.",
    ),
    (DEFAULT_POSITIVE, "Subskrybuj"),
    (DEFAULT_NEGATIVE, "Później"),
];

const LANGUAGES: &[(&str, Table)] = &[
    ("fr", FR),
    ("es", ES),
    ("it", IT),
    ("de", DE),
    ("pt", PT),
    ("nl", NL),
    ("pl", PL),
];

/// Translates dialog strings for the language picked from the host's
/// active locales.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    table: Option<Table>,
}

impl Translator {
    /// Pick a language from an ordered list of locale tags.
    ///
    /// Only the primary subtag of the first tag is considered
    /// (`"fr-FR"` and `"fr_CA"` both select French). Locales without a
    /// translation table translate to the source strings.
    pub fn new(locales: &[String]) -> Self {
        let language = locales
            .first()
            .and_then(|tag| tag.split(['-', '_']).next())
            .map(str::to_ascii_lowercase);
        let table = language.and_then(|lang| {
            LANGUAGES
                .iter()
                .find(|(code, _)| *code == lang)
                .map(|(_, table)| *table)
        });
        Self { table }
    }

    /// Translate the given source string.
    pub fn tr(&self, text: &str) -> String {
        self.table
            .and_then(|table| {
                table
                    .iter()
                    .find(|(source, _)| *source == text)
                    .map(|(_, translated)| (*translated).to_string())
            })
            .unwrap_or_else(|| text.to_string())
    }
}
