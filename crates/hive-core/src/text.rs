//! User-facing strings in every supported language
//!
//! Strings are UTF-8. Mapping Greek letters onto the LCD's character set is
//! the display adapter's business.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Greek,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Greek,
            Language::Greek => Language::English,
        }
    }

    /// Name of the language in itself.
    pub fn name(self) -> &'static str {
        text(TextId::LanguageName, self)
    }
}

/// Identifier of every label and fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextId {
    // Top level menu
    Status,
    Time,
    Measurements,
    Weather,
    Connectivity,
    Calibration,
    Language,
    SdInfo,
    Back,

    // Calibration submenu
    Tare,
    Calibrate,
    RawValue,
    Battery,
    AccelZero,
    TempOffset,
    HumidityOffset,
    Summary,

    // Screen content
    BackHint,
    LanguageName,
    Done,
    Failed,
    NotReady,
    Working,
    SdCardInfo,
    SdOk,
    NoCard,
    WifiConnected,
    LteRegistered,
    NoConnectivity,
    WeatherHeader,
    WeatherNoData,
    WeightLabel,
    BatteryLabel,
    DateLabel,
    TimeLabel,
    SourceLabel,
    KnownWeight,
    MeasuredVolts,
    SelectToSave,
    InternalTemp,
    InternalHumidity,
    ExternalTemp,
    ExternalHumidity,
    Pressure,
    Accel,
}

/// Resolve `id` in `lang`.
pub fn text(id: TextId, lang: Language) -> &'static str {
    match lang {
        Language::English => english(id),
        Language::Greek => greek(id),
    }
}

fn english(id: TextId) -> &'static str {
    use TextId::*;
    match id {
        Status => "STATUS",
        Time => "TIME",
        Measurements => "MEASUREMENTS",
        Weather => "WEATHER",
        Connectivity => "CONNECTIVITY",
        Calibration => "CALIBRATION",
        Language => "LANGUAGE",
        SdInfo => "SD INFO",
        Back => "BACK",

        Tare => "TARE",
        Calibrate => "CALIBRATE",
        RawValue => "RAW VALUE",
        Battery => "BATTERY",
        AccelZero => "ACCEL ZERO",
        TempOffset => "TEMP OFFSET",
        HumidityOffset => "HUMIDITY OFFSET",
        Summary => "SUMMARY",

        BackHint => "< BACK",
        LanguageName => "ENGLISH",
        Done => "DONE",
        Failed => "FAILED",
        NotReady => "SENSOR NOT READY",
        Working => "PLEASE WAIT...",
        SdCardInfo => "SD CARD INFO",
        SdOk => "CARD PRESENT",
        NoCard => "NO CARD",
        WifiConnected => "WIFI CONNECTED",
        LteRegistered => "LTE REGISTERED",
        NoConnectivity => "NO CONNECTIVITY",
        WeatherHeader => "WEATHER=====>SEL==>",
        WeatherNoData => "NO DATA",
        WeightLabel => "WEIGHT:",
        BatteryLabel => "BATTERY:",
        DateLabel => "DATE:",
        TimeLabel => "TIME:",
        SourceLabel => "SRC:",
        KnownWeight => "KNOWN WEIGHT",
        MeasuredVolts => "MEASURED VOLTS",
        SelectToSave => "SEL=SAVE",
        InternalTemp => "T_INT:",
        InternalHumidity => "H_INT:",
        ExternalTemp => "T_EXT:",
        ExternalHumidity => "H_EXT:",
        Pressure => "PRESS:",
        Accel => "ACC:",
    }
}

fn greek(id: TextId) -> &'static str {
    use TextId::*;
    match id {
        Status => "ΚΑΤΑΣΤΑΣΗ",
        Time => "ΩΡΑ",
        Measurements => "ΜΕΤΡΗΣΕΙΣ",
        Weather => "ΚΑΙΡΟΣ",
        Connectivity => "ΣΥΝΔΕΣΙΜΟΤΗΤΑ",
        Calibration => "ΒΑΘΜΟΝΟΜΗΣΗ",
        Language => "ΓΛΩΣΣΑ",
        SdInfo => "ΚΑΡΤΑ SD",
        Back => "ΠΙΣΩ",

        Tare => "ΜΗΔΕΝΙΣΜΟΣ",
        Calibrate => "ΒΑΘΜΟΝΟΜΗΣΗ",
        RawValue => "RAW ΤΙΜΗ",
        Battery => "ΜΠΑΤΑΡΙΑ",
        AccelZero => "ΜΗΔΕΝ ΕΠΙΤΑΧ.",
        TempOffset => "ΔΙΟΡΘ. ΘΕΡΜ.",
        HumidityOffset => "ΔΙΟΡΘ. ΥΓΡ.",
        Summary => "ΣΥΝΟΨΗ",

        BackHint => "< ΠΙΣΩ",
        LanguageName => "ΕΛΛΗΝΙΚΑ",
        Done => "ΟΚ",
        Failed => "ΑΠΟΤΥΧΙΑ",
        NotReady => "ΑΙΣΘΗΤΗΡΑΣ ΕΚΤΟΣ",
        Working => "ΠΑΡΑΚΑΛΩ ΠΕΡΙΜΕΝΕΤΕ",
        SdCardInfo => "ΚΑΡΤΑ SD",
        SdOk => "ΚΑΡΤΑ ΟΚ",
        NoCard => "ΧΩΡΙΣ ΚΑΡΤΑ",
        WifiConnected => "WIFI ΣΥΝΔΕΔΕΜΕΝΟ",
        LteRegistered => "LTE ΣΥΝΔΕΔΕΜΕΝΟ",
        NoConnectivity => "ΧΩΡΙΣ ΣΥΝΔΕΣΗ",
        WeatherHeader => "ΚΑΙΡΟΣ=====>SEL==>",
        WeatherNoData => "ΧΩΡΙΣ ΔΕΔΟΜΕΝΑ",
        WeightLabel => "ΒΑΡΟΣ:",
        BatteryLabel => "ΜΠΑΤΑΡΙΑ:",
        DateLabel => "ΗΜ/ΝΙΑ:",
        TimeLabel => "ΩΡΑ:",
        SourceLabel => "ΠΗΓΗ:",
        KnownWeight => "ΓΝΩΣΤΟ ΒΑΡΟΣ",
        MeasuredVolts => "ΜΕΤΡ. ΤΑΣΗ",
        SelectToSave => "SEL=ΑΠΟΘ.",
        InternalTemp => "ΘΕΡΜ.ΕΣΩ:",
        InternalHumidity => "ΥΓΡ.ΕΣΩ:",
        ExternalTemp => "ΘΕΡΜ.ΕΞΩ:",
        ExternalHumidity => "ΥΓΡ.ΕΞΩ:",
        Pressure => "ΑΤΜ.ΠΙΕΣΗ:",
        Accel => "ΕΠΙΤ:",
    }
}
