use bebidas::customers::{Classification, Coordinates, CustomerDraft, Phone, TaxRegistration};
use bebidas_app::api::forms::DEFAULT_PHONE_DESCRIPTION;
use clap::Args;

/// Customer details shared by the create and update commands.
///
/// Every field is optional so `update` only changes what is given.
#[derive(Debug, Args)]
pub(super) struct CustomerFields {
    /// First name
    #[arg(long)]
    name: Option<String>,

    /// Last names
    #[arg(long)]
    last_name: Option<String>,

    /// National identity document number
    #[arg(long)]
    dni: Option<String>,

    /// Street address
    #[arg(long)]
    address: Option<String>,

    /// District
    #[arg(long)]
    district: Option<String>,

    /// Customer type: mayorista or minorista
    #[arg(long, value_parser = parse_classification)]
    classification: Option<Classification>,

    /// RUC, for customers that invoice as a business
    #[arg(long)]
    ruc: Option<String>,

    /// Registered business name
    #[arg(long)]
    business_name: Option<String>,

    /// Phone as `<number>[:<label>]`; repeat for each number. Replaces the stored numbers
    #[arg(long = "phone", value_parser = parse_phone)]
    phones: Vec<Phone>,

    /// Shop location as `<latitude>,<longitude>`
    #[arg(long, value_parser = parse_location, allow_hyphen_values = true)]
    location: Option<Coordinates>,
}

impl CustomerFields {
    /// Overwrite the draft with every field that was given.
    pub(super) fn apply(self, draft: &mut CustomerDraft) -> Result<(), String> {
        let assignments = [
            (self.name, &mut draft.first_name),
            (self.last_name, &mut draft.last_name),
            (self.dni, &mut draft.dni),
            (self.address, &mut draft.address),
        ];

        for (value, field) in assignments {
            if let Some(value) = value {
                *field = value;
            }
        }

        if let Some(district) = self.district {
            draft.district = Some(district);
        }

        if let Some(classification) = self.classification {
            draft.classification = classification;
        }

        match (self.ruc, self.business_name) {
            (Some(ruc), business_name) => {
                let business_name = business_name
                    .or_else(|| draft.tax.take().and_then(|tax| tax.business_name));

                draft.tax = Some(TaxRegistration { ruc, business_name });
            }
            (None, Some(business_name)) => match draft.tax.as_mut() {
                Some(tax) => tax.business_name = Some(business_name),
                None => return Err("--business-name needs a RUC".to_string()),
            },
            (None, None) => {}
        }

        if !self.phones.is_empty() {
            draft.phones = self.phones;
        }

        if let Some(location) = self.location {
            draft.coordinates = Some(location);
        }

        Ok(())
    }
}

fn parse_classification(value: &str) -> Result<Classification, String> {
    match value.trim().to_lowercase().as_str() {
        "mayorista" | "wholesale" => Ok(Classification::Wholesale),
        "minorista" | "retail" => Ok(Classification::Retail),
        _ => Err(format!("expected mayorista or minorista, got {value:?}")),
    }
}

fn parse_phone(value: &str) -> Result<Phone, String> {
    let (number, description) = value.split_once(':').unwrap_or((value, ""));

    let number = number.trim();

    if number.is_empty() {
        return Err(format!("missing phone number in {value:?}"));
    }

    let description = match description.trim() {
        "" => DEFAULT_PHONE_DESCRIPTION,
        description => description,
    };

    Ok(Phone {
        number: number.to_string(),
        description: description.to_string(),
    })
}

fn parse_location(value: &str) -> Result<Coordinates, String> {
    let (latitude, longitude) = value
        .split_once(',')
        .ok_or_else(|| format!("expected <latitude>,<longitude>, got {value:?}"))?;

    let latitude = latitude
        .trim()
        .parse::<f64>()
        .map_err(|error| format!("invalid latitude {latitude:?}: {error}"))?;

    let longitude = longitude
        .trim()
        .parse::<f64>()
        .map_err(|error| format!("invalid longitude {longitude:?}: {error}"))?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("location {value:?} is out of range"));
    }

    Ok(Coordinates {
        latitude,
        longitude,
    })
}
