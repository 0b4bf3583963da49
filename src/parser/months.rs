/// Every known case form of each month, January first.
pub struct MonthVocabulary {
    forms: &'static [(u32, [&'static str; 3])],
}

/// Nominative, genitive, prepositional.
static VOCABULARY: MonthVocabulary = MonthVocabulary {
    forms: &[
        (1, ["январь", "января", "январе"]),
        (2, ["февраль", "февраля", "феврале"]),
        (3, ["март", "марта", "марте"]),
        (4, ["апрель", "апреля", "апреле"]),
        (5, ["май", "мая", "мае"]),
        (6, ["июнь", "июня", "июне"]),
        (7, ["июль", "июля", "июле"]),
        (8, ["август", "августа", "августе"]),
        (9, ["сентябрь", "сентября", "сентябре"]),
        (10, ["октябрь", "октября", "октябре"]),
        (11, ["ноябрь", "ноября", "ноябре"]),
        (12, ["декабрь", "декабря", "декабре"]),
    ],
};

impl MonthVocabulary {
    pub fn global() -> &'static MonthVocabulary {
        &VOCABULARY
    }

    /// Month number of the first form contained anywhere in `text`.
    /// Substring match, so "августа" inside a longer phrase still counts.
    pub fn resolve(&self, text: &str) -> Option<u32> {
        let lower = text.to_lowercase();
        self.forms
            .iter()
            .find(|(_, forms)| forms.iter().any(|f| lower.contains(f)))
            .map(|(num, _)| *num)
    }

    /// Genitive forms, as used in "1 января:" day labels.
    pub fn genitives(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.forms.iter().map(|(_, forms)| forms[1])
    }
}

/// Resolve against the process-wide vocabulary.
pub fn resolve(text: &str) -> Option<u32> {
    MonthVocabulary::global().resolve(text)
}
