//! Payment method registry
//!
//! One table describes every supported mobile-money method: its country,
//! operator, display name, provider codes and the default primary/fallback
//! provider pair. The `PaymentMethod` enum and the table are generated by the
//! same macro invocation, so a method cannot exist without all of its
//! attributes.

use crate::payments::types::{MethodAvailability, ProviderPair};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported countries (ISO 3166-1 alpha-3 on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "BEN")]
    Benin,
    #[serde(rename = "BFA")]
    BurkinaFaso,
    #[serde(rename = "CMR")]
    Cameroon,
    #[serde(rename = "CIV")]
    CoteDIvoire,
    #[serde(rename = "COG")]
    Congo,
    #[serde(rename = "COD")]
    DrCongo,
    #[serde(rename = "GHA")]
    Ghana,
    #[serde(rename = "KEN")]
    Kenya,
    #[serde(rename = "MLI")]
    Mali,
    #[serde(rename = "RWA")]
    Rwanda,
    #[serde(rename = "SEN")]
    Senegal,
    #[serde(rename = "TZA")]
    Tanzania,
    #[serde(rename = "TGO")]
    Togo,
    #[serde(rename = "UGA")]
    Uganda,
    #[serde(rename = "ZMB")]
    Zambia,
}

impl Country {
    pub const ALL: &'static [Country] = &[
        Country::Benin,
        Country::BurkinaFaso,
        Country::Cameroon,
        Country::CoteDIvoire,
        Country::Congo,
        Country::DrCongo,
        Country::Ghana,
        Country::Kenya,
        Country::Mali,
        Country::Rwanda,
        Country::Senegal,
        Country::Tanzania,
        Country::Togo,
        Country::Uganda,
        Country::Zambia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Country::Benin => "BEN",
            Country::BurkinaFaso => "BFA",
            Country::Cameroon => "CMR",
            Country::CoteDIvoire => "CIV",
            Country::Congo => "COG",
            Country::DrCongo => "COD",
            Country::Ghana => "GHA",
            Country::Kenya => "KEN",
            Country::Mali => "MLI",
            Country::Rwanda => "RWA",
            Country::Senegal => "SEN",
            Country::Tanzania => "TZA",
            Country::Togo => "TGO",
            Country::Uganda => "UGA",
            Country::Zambia => "ZMB",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Country::Benin => "Benin",
            Country::BurkinaFaso => "Burkina Faso",
            Country::Cameroon => "Cameroon",
            Country::CoteDIvoire => "Côte d'Ivoire",
            Country::Congo => "Congo",
            Country::DrCongo => "DR Congo",
            Country::Ghana => "Ghana",
            Country::Kenya => "Kenya",
            Country::Mali => "Mali",
            Country::Rwanda => "Rwanda",
            Country::Senegal => "Senegal",
            Country::Tanzania => "Tanzania",
            Country::Togo => "Togo",
            Country::Uganda => "Uganda",
            Country::Zambia => "Zambia",
        }
    }

    /// Currencies a payment in this country may settle in; the first is the default
    pub fn currencies(&self) -> &'static [Currency] {
        match self {
            Country::Benin
            | Country::BurkinaFaso
            | Country::CoteDIvoire
            | Country::Mali
            | Country::Senegal
            | Country::Togo => &[Currency::Xof],
            Country::Cameroon | Country::Congo => &[Currency::Xaf],
            Country::DrCongo => &[Currency::Cdf, Currency::Usd],
            Country::Ghana => &[Currency::Ghs],
            Country::Kenya => &[Currency::Kes],
            Country::Rwanda => &[Currency::Rwf],
            Country::Tanzania => &[Currency::Tzs],
            Country::Uganda => &[Currency::Ugx],
            Country::Zambia => &[Currency::Zmw],
        }
    }

    pub fn default_currency(&self) -> Currency {
        self.currencies()[0]
    }

    pub fn accepts(&self, currency: Currency) -> bool {
        self.currencies().contains(&currency)
    }

    pub fn payment_methods(self) -> impl Iterator<Item = PaymentMethod> {
        PaymentMethod::ALL
            .iter()
            .copied()
            .filter(move |method| method.country() == self)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Country::ALL
            .iter()
            .copied()
            .find(|country| country.as_str() == code)
            .ok_or_else(|| format!("unsupported country: {}", s))
    }
}

/// Supported settlement currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Xof,
    Xaf,
    Cdf,
    Usd,
    Ghs,
    Kes,
    Rwf,
    Tzs,
    Ugx,
    Zmw,
}

impl Currency {
    pub const ALL: &'static [Currency] = &[
        Currency::Xof,
        Currency::Xaf,
        Currency::Cdf,
        Currency::Usd,
        Currency::Ghs,
        Currency::Kes,
        Currency::Rwf,
        Currency::Tzs,
        Currency::Ugx,
        Currency::Zmw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Xof => "XOF",
            Currency::Xaf => "XAF",
            Currency::Cdf => "CDF",
            Currency::Usd => "USD",
            Currency::Ghs => "GHS",
            Currency::Kes => "KES",
            Currency::Rwf => "RWF",
            Currency::Tzs => "TZS",
            Currency::Ugx => "UGX",
            Currency::Zmw => "ZMW",
        }
    }

    /// Number of decimal places mobile-money operators accept
    pub fn minor_units(&self) -> u32 {
        match self {
            Currency::Xof | Currency::Xaf | Currency::Rwf | Currency::Ugx => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|currency| currency.as_str() == code)
            .ok_or_else(|| format!("unsupported currency: {}", s))
    }
}

/// Payment processors the backend may route a payment through
///
/// Names are matched case-insensitively when decoding; anything unrecognised
/// becomes `Unknown` rather than failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Provider {
    Paydunya,
    Pawapay,
    Moneroo,
    /// A provider name this client does not know about
    Unknown,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Paydunya => "paydunya",
            Provider::Pawapay => "pawapay",
            Provider::Moneroo => "moneroo",
            Provider::Unknown => "unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Paydunya => "PayDunya",
            Provider::Pawapay => "pawaPay",
            Provider::Moneroo => "Moneroo",
            Provider::Unknown => "Unknown provider",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Provider {
    fn from(name: String) -> Self {
        name.parse().unwrap_or(Provider::Unknown)
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paydunya" => Ok(Provider::Paydunya),
            "pawapay" => Ok(Provider::Pawapay),
            "moneroo" => Ok(Provider::Moneroo),
            _ => Err(format!("unsupported provider: {}", s)),
        }
    }
}

/// Mobile-money operators, used for branding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Mtn,
    Orange,
    Moov,
    Airtel,
    AirtelTigo,
    Wave,
    FreeMoney,
    Mpesa,
    Telecel,
    Tigo,
    TMoney,
    Vodacom,
    Zamtel,
}

impl Operator {
    pub fn display_name(&self) -> &'static str {
        match self {
            Operator::Mtn => "MTN",
            Operator::Orange => "Orange",
            Operator::Moov => "Moov",
            Operator::Airtel => "Airtel",
            Operator::AirtelTigo => "AirtelTigo",
            Operator::Wave => "Wave",
            Operator::FreeMoney => "Free Money",
            Operator::Mpesa => "M-Pesa",
            Operator::Telecel => "Telecel",
            Operator::Tigo => "Tigo",
            Operator::TMoney => "T-Money",
            Operator::Vodacom => "Vodacom",
            Operator::Zamtel => "Zamtel",
        }
    }

    /// Brand colour as a hex triplet
    pub fn brand_color(&self) -> &'static str {
        match self {
            Operator::Mtn => "#FFCC00",
            Operator::Orange => "#FF7900",
            Operator::Moov => "#0066B3",
            Operator::Airtel => "#E40000",
            Operator::AirtelTigo => "#ED1C24",
            Operator::Wave => "#1DC4FF",
            Operator::FreeMoney => "#CD1E25",
            Operator::Mpesa => "#4CAF50",
            Operator::Telecel => "#E60000",
            Operator::Tigo => "#00377B",
            Operator::TMoney => "#FFD200",
            Operator::Vodacom => "#E60000",
            Operator::Zamtel => "#009A44",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Operator::Mtn => "mtn",
            Operator::Orange => "orange",
            Operator::Moov => "moov",
            Operator::Airtel => "airtel",
            Operator::AirtelTigo => "airteltigo",
            Operator::Wave => "wave",
            Operator::FreeMoney => "free-money",
            Operator::Mpesa => "mpesa",
            Operator::Telecel => "telecel",
            Operator::Tigo => "tigo",
            Operator::TMoney => "tmoney",
            Operator::Vodacom => "vodacom",
            Operator::Zamtel => "zamtel",
        }
    }
}

/// Provider-specific identifiers for one payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCodes {
    /// Pawapay correspondent, e.g. `MTN_MOMO_ZMB`
    pub pawapay: Option<&'static str>,
    /// PayDunya softpay slug, e.g. `orange-money-senegal`
    pub paydunya: Option<&'static str>,
    /// Moneroo method code, e.g. `mtn_bj`
    pub moneroo: Option<&'static str>,
}

/// Every attribute of a payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodEntry {
    pub method: PaymentMethod,
    pub key: &'static str,
    pub display_name: &'static str,
    pub country: Country,
    pub operator: Operator,
    pub codes: ProviderCodes,
    pub primary: Provider,
    pub fallback: Option<Provider>,
    /// Whether the customer must confirm with an operator-issued OTP
    pub requires_otp: bool,
}

impl MethodEntry {
    pub fn provider_code(&self, provider: Provider) -> Option<&'static str> {
        match provider {
            Provider::Pawapay => self.codes.pawapay,
            Provider::Paydunya => self.codes.paydunya,
            Provider::Moneroo => self.codes.moneroo,
            Provider::Unknown => None,
        }
    }

    /// True when the backend may route this method through `provider`
    pub fn serves(&self, provider: Provider) -> bool {
        provider == self.primary || Some(provider) == self.fallback
    }

    pub fn default_pair(&self) -> ProviderPair {
        ProviderPair {
            primary: self.primary,
            fallback: self.fallback,
        }
    }
}

macro_rules! payment_methods {
    ($(
        $variant:ident => {
            key: $key:literal,
            name: $name:literal,
            country: $country:ident,
            operator: $operator:ident,
            pawapay: $pawapay:expr,
            paydunya: $paydunya:expr,
            moneroo: $moneroo:expr,
            primary: $primary:ident,
            fallback: $fallback:expr,
            otp: $otp:literal $(,)?
        }
    ),+ $(,)?) => {
        /// A mobile-money method in a specific country
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum PaymentMethod {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl PaymentMethod {
            pub const ALL: &'static [PaymentMethod] = &[$(PaymentMethod::$variant),+];
        }

        // Indexed by discriminant, so the order must match the enum.
        static METHOD_TABLE: &[MethodEntry] = &[
            $(
                MethodEntry {
                    method: PaymentMethod::$variant,
                    key: $key,
                    display_name: $name,
                    country: Country::$country,
                    operator: Operator::$operator,
                    codes: ProviderCodes {
                        pawapay: $pawapay,
                        paydunya: $paydunya,
                        moneroo: $moneroo,
                    },
                    primary: Provider::$primary,
                    fallback: $fallback,
                    requires_otp: $otp,
                },
            )+
        ];
    };
}

payment_methods! {
    MtnMomoBenin => {
        key: "mtn-momo-benin", name: "MTN Mobile Money",
        country: Benin, operator: Mtn,
        pawapay: Some("MTN_MOMO_BEN"), paydunya: Some("mtn-benin"), moneroo: Some("mtn_bj"),
        primary: Pawapay, fallback: Some(Provider::Moneroo), otp: false,
    },
    MoovBenin => {
        key: "moov-benin", name: "Moov Money",
        country: Benin, operator: Moov,
        pawapay: Some("MOOV_BEN"), paydunya: Some("moov-benin"), moneroo: Some("moov_bj"),
        primary: Pawapay, fallback: Some(Provider::Moneroo), otp: false,
    },
    OrangeMoneyBurkina => {
        key: "orange-money-burkina", name: "Orange Money",
        country: BurkinaFaso, operator: Orange,
        pawapay: Some("ORANGE_BFA"), paydunya: Some("orange-money-burkina"), moneroo: None,
        primary: Pawapay, fallback: Some(Provider::Paydunya), otp: false,
    },
    MoovBurkina => {
        key: "moov-burkina", name: "Moov Money",
        country: BurkinaFaso, operator: Moov,
        pawapay: Some("MOOV_BFA"), paydunya: Some("moov-burkina-faso"), moneroo: None,
        primary: Pawapay, fallback: Some(Provider::Paydunya), otp: false,
    },
    MtnMomoCameroon => {
        key: "mtn-momo-cameroon", name: "MTN Mobile Money",
        country: Cameroon, operator: Mtn,
        pawapay: Some("MTN_MOMO_CMR"), paydunya: None, moneroo: Some("mtn_cm"),
        primary: Pawapay, fallback: Some(Provider::Moneroo), otp: false,
    },
    OrangeMoneyCameroon => {
        key: "orange-money-cameroon", name: "Orange Money",
        country: Cameroon, operator: Orange,
        pawapay: Some("ORANGE_CMR"), paydunya: None, moneroo: Some("orange_cm"),
        primary: Pawapay, fallback: Some(Provider::Moneroo), otp: false,
    },
    OrangeMoneyCi => {
        key: "orange-money-ci", name: "Orange Money",
        country: CoteDIvoire, operator: Orange,
        pawapay: Some("ORANGE_CIV"), paydunya: Some("orange-money-ci"), moneroo: Some("orange_ci"),
        primary: Paydunya, fallback: Some(Provider::Pawapay), otp: true,
    },
    MtnMomoCi => {
        key: "mtn-momo-ci", name: "MTN Mobile Money",
        country: CoteDIvoire, operator: Mtn,
        pawapay: Some("MTN_MOMO_CIV"), paydunya: Some("mtn-ci"), moneroo: Some("mtn_ci"),
        primary: Pawapay, fallback: Some(Provider::Paydunya), otp: false,
    },
    MoovCi => {
        key: "moov-ci", name: "Moov Money",
        country: CoteDIvoire, operator: Moov,
        pawapay: None, paydunya: Some("moov-ci"), moneroo: Some("moov_ci"),
        primary: Paydunya, fallback: Some(Provider::Moneroo), otp: false,
    },
    WaveCi => {
        key: "wave-ci", name: "Wave",
        country: CoteDIvoire, operator: Wave,
        pawapay: None, paydunya: Some("wave-ci"), moneroo: Some("wave_ci"),
        primary: Paydunya, fallback: Some(Provider::Moneroo), otp: false,
    },
    MtnMomoCongo => {
        key: "mtn-momo-congo", name: "MTN Mobile Money",
        country: Congo, operator: Mtn,
        pawapay: Some("MTN_MOMO_COG"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    AirtelMoneyCongo => {
        key: "airtel-money-congo", name: "Airtel Money",
        country: Congo, operator: Airtel,
        pawapay: Some("AIRTEL_COG"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    VodacomMpesaDrc => {
        key: "vodacom-mpesa-drc", name: "Vodacom M-Pesa",
        country: DrCongo, operator: Vodacom,
        pawapay: Some("VODACOM_MPESA_COD"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    AirtelMoneyDrc => {
        key: "airtel-money-drc", name: "Airtel Money",
        country: DrCongo, operator: Airtel,
        pawapay: Some("AIRTEL_COD"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    OrangeMoneyDrc => {
        key: "orange-money-drc", name: "Orange Money",
        country: DrCongo, operator: Orange,
        pawapay: Some("ORANGE_COD"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    MtnMomoGhana => {
        key: "mtn-momo-ghana", name: "MTN Mobile Money",
        country: Ghana, operator: Mtn,
        pawapay: Some("MTN_MOMO_GHA"), paydunya: None, moneroo: Some("mtn_gh"),
        primary: Pawapay, fallback: Some(Provider::Moneroo), otp: false,
    },
    TelecelCashGhana => {
        key: "telecel-cash-ghana", name: "Telecel Cash",
        country: Ghana, operator: Telecel,
        pawapay: Some("VODAFONE_GHA"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    AirtelTigoGhana => {
        key: "airteltigo-ghana", name: "AirtelTigo Money",
        country: Ghana, operator: AirtelTigo,
        pawapay: Some("AIRTELTIGO_GHA"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    MpesaKenya => {
        key: "mpesa-kenya", name: "M-Pesa",
        country: Kenya, operator: Mpesa,
        pawapay: Some("MPESA_KEN"), paydunya: None, moneroo: Some("mpesa_ke"),
        primary: Pawapay, fallback: Some(Provider::Moneroo), otp: false,
    },
    OrangeMoneyMali => {
        key: "orange-money-mali", name: "Orange Money",
        country: Mali, operator: Orange,
        pawapay: None, paydunya: Some("orange-money-mali"), moneroo: None,
        primary: Paydunya, fallback: None, otp: false,
    },
    MtnMomoRwanda => {
        key: "mtn-momo-rwanda", name: "MTN Mobile Money",
        country: Rwanda, operator: Mtn,
        pawapay: Some("MTN_MOMO_RWA"), paydunya: None, moneroo: Some("mtn_rw"),
        primary: Pawapay, fallback: Some(Provider::Moneroo), otp: false,
    },
    AirtelMoneyRwanda => {
        key: "airtel-money-rwanda", name: "Airtel Money",
        country: Rwanda, operator: Airtel,
        pawapay: Some("AIRTEL_RWA"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    OrangeMoneySenegal => {
        key: "orange-money-senegal", name: "Orange Money",
        country: Senegal, operator: Orange,
        pawapay: Some("ORANGE_SEN"), paydunya: Some("orange-money-senegal"), moneroo: Some("orange_sn"),
        primary: Paydunya, fallback: Some(Provider::Pawapay), otp: false,
    },
    WaveSenegal => {
        key: "wave-senegal", name: "Wave",
        country: Senegal, operator: Wave,
        pawapay: None, paydunya: Some("wave-senegal"), moneroo: Some("wave_sn"),
        primary: Paydunya, fallback: Some(Provider::Moneroo), otp: false,
    },
    FreeMoneySenegal => {
        key: "free-money-senegal", name: "Free Money",
        country: Senegal, operator: FreeMoney,
        pawapay: Some("FREE_SEN"), paydunya: Some("free-money-senegal"), moneroo: Some("freemoney_sn"),
        primary: Paydunya, fallback: Some(Provider::Pawapay), otp: false,
    },
    MpesaTanzania => {
        key: "mpesa-tanzania", name: "Vodacom M-Pesa",
        country: Tanzania, operator: Vodacom,
        pawapay: Some("VODACOM_TZA"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    AirtelMoneyTanzania => {
        key: "airtel-money-tanzania", name: "Airtel Money",
        country: Tanzania, operator: Airtel,
        pawapay: Some("AIRTEL_TZA"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    TigoPesaTanzania => {
        key: "tigo-pesa-tanzania", name: "Tigo Pesa",
        country: Tanzania, operator: Tigo,
        pawapay: Some("TIGO_TZA"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    TMoneyTogo => {
        key: "t-money-togo", name: "T-Money",
        country: Togo, operator: TMoney,
        pawapay: None, paydunya: Some("t-money-togo"), moneroo: None,
        primary: Paydunya, fallback: None, otp: false,
    },
    MoovTogo => {
        key: "moov-togo", name: "Moov Money",
        country: Togo, operator: Moov,
        pawapay: None, paydunya: Some("moov-togo"), moneroo: Some("moov_tg"),
        primary: Paydunya, fallback: Some(Provider::Moneroo), otp: false,
    },
    MtnMomoUganda => {
        key: "mtn-momo-uganda", name: "MTN Mobile Money",
        country: Uganda, operator: Mtn,
        pawapay: Some("MTN_MOMO_UGA"), paydunya: None, moneroo: Some("mtn_ug"),
        primary: Pawapay, fallback: Some(Provider::Moneroo), otp: false,
    },
    AirtelMoneyUganda => {
        key: "airtel-money-uganda", name: "Airtel Money",
        country: Uganda, operator: Airtel,
        pawapay: Some("AIRTEL_OAPI_UGA"), paydunya: None, moneroo: Some("airtel_ug"),
        primary: Pawapay, fallback: Some(Provider::Moneroo), otp: false,
    },
    MtnMomoZambia => {
        key: "mtn-momo-zambia", name: "MTN Mobile Money",
        country: Zambia, operator: Mtn,
        pawapay: Some("MTN_MOMO_ZMB"), paydunya: None, moneroo: Some("mtn_zm"),
        primary: Pawapay, fallback: Some(Provider::Moneroo), otp: false,
    },
    AirtelMoneyZambia => {
        key: "airtel-money-zambia", name: "Airtel Money",
        country: Zambia, operator: Airtel,
        pawapay: Some("AIRTEL_OAPI_ZMB"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
    ZamtelKwachaZambia => {
        key: "zamtel-zambia", name: "Zamtel Kwacha",
        country: Zambia, operator: Zamtel,
        pawapay: Some("ZAMTEL_ZMB"), paydunya: None, moneroo: None,
        primary: Pawapay, fallback: None, otp: false,
    },
}

impl PaymentMethod {
    pub fn entry(self) -> &'static MethodEntry {
        &METHOD_TABLE[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.entry().key
    }

    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    pub fn country(self) -> Country {
        self.entry().country
    }

    pub fn operator(self) -> Operator {
        self.entry().operator
    }

    pub fn requires_otp(self) -> bool {
        self.entry().requires_otp
    }

    pub fn provider_code(self, provider: Provider) -> Option<&'static str> {
        self.entry().provider_code(provider)
    }

    pub fn from_key(key: &str) -> Option<PaymentMethod> {
        let key = key.trim();
        METHOD_TABLE
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(key))
            .map(|entry| entry.method)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::from_key(s).ok_or_else(|| format!("unsupported payment method: {}", s))
    }
}

/// Provider pairs the registry would use for a country when the backend is not consulted
pub fn default_availability(country: Country) -> MethodAvailability {
    country
        .payment_methods()
        .map(|method| (method.key().to_string(), method.entry().default_pair()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_discriminant() {
        assert_eq!(METHOD_TABLE.len(), PaymentMethod::ALL.len());
        for method in PaymentMethod::ALL {
            assert_eq!(method.entry().method, *method);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), PaymentMethod::ALL.len());
    }

    #[test]
    fn test_every_method_has_codes_for_its_providers() {
        for method in PaymentMethod::ALL {
            let entry = method.entry();
            assert!(
                entry.provider_code(entry.primary).is_some(),
                "{} has no code for its primary provider",
                entry.key
            );
            if let Some(fallback) = entry.fallback {
                assert_ne!(fallback, entry.primary, "{} falls back to itself", entry.key);
                assert!(
                    entry.provider_code(fallback).is_some(),
                    "{} has no code for its fallback provider",
                    entry.key
                );
            }
        }
    }

    #[test]
    fn test_every_country_has_methods() {
        for country in Country::ALL {
            assert!(
                country.payment_methods().next().is_some(),
                "{} has no payment methods",
                country
            );
        }
    }

    #[test]
    fn test_serde_uses_method_key() {
        let json = serde_json::to_string(&PaymentMethod::MtnMomoZambia).unwrap();
        assert_eq!(json, "\"mtn-momo-zambia\"");

        let parsed: PaymentMethod = serde_json::from_str("\"orange-money-ci\"").unwrap();
        assert_eq!(parsed, PaymentMethod::OrangeMoneyCi);
        assert!(parsed.requires_otp());
    }

    #[test]
    fn test_zambia_mtn_entry() {
        let entry = PaymentMethod::MtnMomoZambia.entry();
        assert_eq!(entry.country, Country::Zambia);
        assert_eq!(entry.country.default_currency(), Currency::Zmw);
        assert_eq!(entry.provider_code(Provider::Pawapay), Some("MTN_MOMO_ZMB"));
        assert!(entry.serves(Provider::Pawapay));
        assert!(!entry.serves(Provider::Paydunya));
    }

    #[test]
    fn test_country_and_currency_parsing() {
        assert_eq!("zmb".parse::<Country>().unwrap(), Country::Zambia);
        assert_eq!("CIV".parse::<Country>().unwrap(), Country::CoteDIvoire);
        assert!("FRA".parse::<Country>().is_err());
        assert_eq!("xof".parse::<Currency>().unwrap(), Currency::Xof);
        assert!(Country::DrCongo.accepts(Currency::Usd));
        assert!(!Country::Senegal.accepts(Currency::Ghs));
    }

    #[test]
    fn test_unknown_provider_deserializes() {
        let provider: Provider = serde_json::from_str("\"flutterwave\"").unwrap();
        assert_eq!(provider, Provider::Unknown);
        let provider: Provider = serde_json::from_str("\"PayDunya\"").unwrap();
        assert_eq!(provider, Provider::Paydunya);
    }

    #[test]
    fn test_provider_names_decode_in_any_case() {
        for (raw, expected) in [
            ("\"Pawapay\"", Provider::Pawapay),
            ("\"MONEROO\"", Provider::Moneroo),
            ("\"payDunya\"", Provider::Paydunya),
            ("\" pawapay \"", Provider::Pawapay),
        ] {
            let provider: Provider = serde_json::from_str(raw).unwrap();
            assert_eq!(provider, expected, "decoding {}", raw);
        }
        assert_eq!(serde_json::to_value(Provider::Pawapay).unwrap(), "pawapay");
    }

    #[test]
    fn test_default_availability_covers_country() {
        let availability = default_availability(Country::Senegal);
        assert_eq!(availability.len(), 3);
        let orange = availability.get("orange-money-senegal").unwrap();
        assert_eq!(orange.primary, Provider::Paydunya);
        assert_eq!(orange.fallback, Some(Provider::Pawapay));
    }
}
