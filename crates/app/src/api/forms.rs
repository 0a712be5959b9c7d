//! Customer forms.
//!
//! Multipart fields sent to the customer create and update endpoints.

use std::path::{Path, PathBuf};

use bebidas::customers::CustomerDraft;

/// Confirmation shown when the backend registers a customer without a message of its own.
pub const CUSTOMER_CREATED_MESSAGE: &str = "¡Cliente creado exitosamente!";

/// Confirmation shown when the backend updates a customer without a message of its own.
pub const CUSTOMER_UPDATED_MESSAGE: &str = "¡Cliente actualizado correctamente!";

/// Label given to phone numbers entered without one.
pub const DEFAULT_PHONE_DESCRIPTION: &str = "Personal";

/// Image files attached to a customer registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPhotos {
    /// Photo of the customer
    pub portrait: Option<PathBuf>,

    /// Photos of the shop front
    pub facades: Vec<PathBuf>,
}

type Fields = Vec<(String, String)>;

/// Text fields of a new customer registration.
///
/// The identity fields are always sent, even blank; optional fields are left out when blank.
pub fn create_fields(draft: &CustomerDraft) -> Fields {
    let mut fields = Fields::new();

    required(&mut fields, "nombre", &draft.first_name);
    required(&mut fields, "apellidos", &draft.last_name);
    required(&mut fields, "tipoCliente", draft.classification.label());
    required(&mut fields, "dni", &draft.dni);
    required(&mut fields, "direccion", &draft.address);

    optional_fields(&mut fields, draft);

    fields
}

/// Text fields of a customer update.
///
/// Blank fields are left out so the backend keeps their stored values. The form is posted
/// with a `_method` override because the backend only reads multipart bodies on `POST`.
pub fn update_fields(draft: &CustomerDraft) -> Fields {
    let mut fields = vec![("_method".to_string(), "PUT".to_string())];

    optional(&mut fields, "nombre", &draft.first_name);
    optional(&mut fields, "apellidos", &draft.last_name);
    required(&mut fields, "tipoCliente", draft.classification.label());
    optional(&mut fields, "dni", &draft.dni);
    optional(&mut fields, "direccion", &draft.address);

    optional_fields(&mut fields, draft);

    fields
}

fn optional_fields(fields: &mut Fields, draft: &CustomerDraft) {
    if let Some(district) = &draft.district {
        optional(fields, "distritos", district);
    }

    if let Some(tax) = &draft.tax {
        optional(fields, "ruc", &tax.ruc);

        if let Some(business_name) = &tax.business_name {
            optional(fields, "razonSocial", business_name);
        }
    }

    if let Some(coordinates) = draft.coordinates {
        required(fields, "coordenadas[latitud]", &coordinates.latitude.to_string());
        required(fields, "coordenadas[longitud]", &coordinates.longitude.to_string());
    }

    let phones = draft
        .phones
        .iter()
        .filter(|phone| !phone.number.trim().is_empty());

    for (index, phone) in phones.enumerate() {
        let description = match phone.description.trim() {
            "" => DEFAULT_PHONE_DESCRIPTION,
            description => description,
        };

        required(fields, &format!("telefonos[{index}][number]"), &phone.number);
        required(fields, &format!("telefonos[{index}][description]"), description);
    }
}

fn required(fields: &mut Fields, name: &str, value: &str) {
    fields.push((name.to_string(), value.trim().to_string()));
}

fn optional(fields: &mut Fields, name: &str, value: &str) {
    if !value.trim().is_empty() {
        required(fields, name, value);
    }
}

/// Content type of an image file, judged by its extension.
pub fn image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use bebidas::customers::{Classification, Coordinates, Phone, TaxRegistration};

    use super::*;

    fn draft() -> CustomerDraft {
        CustomerDraft {
            first_name: "Rosa".to_string(),
            last_name: "Quispe".to_string(),
            dni: "41234567".to_string(),
            address: " Av. Grau 123 ".to_string(),
            district: Some("Ate".to_string()),
            classification: Classification::Wholesale,
            tax: Some(TaxRegistration {
                ruc: "20123456789".to_string(),
                business_name: None,
            }),
            phones: vec![
                Phone {
                    number: "987654321".to_string(),
                    description: String::new(),
                },
                Phone {
                    number: " ".to_string(),
                    description: "Trabajo".to_string(),
                },
                Phone {
                    number: "061571234".to_string(),
                    description: "Tienda".to_string(),
                },
            ],
            coordinates: Some(Coordinates {
                latitude: -8.379,
                longitude: -74.553,
            }),
        }
    }

    fn value<'a>(fields: &'a Fields, name: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn create_fields_use_backend_names() {
        let fields = create_fields(&draft());

        assert_eq!(value(&fields, "nombre"), Some("Rosa"));
        assert_eq!(value(&fields, "tipoCliente"), Some("Mayorista"));
        assert_eq!(value(&fields, "direccion"), Some("Av. Grau 123"));
        assert_eq!(value(&fields, "ruc"), Some("20123456789"));
        assert_eq!(value(&fields, "razonSocial"), None);
        assert_eq!(value(&fields, "coordenadas[latitud]"), Some("-8.379"));
        assert_eq!(value(&fields, "coordenadas[longitud]"), Some("-74.553"));
        assert_eq!(value(&fields, "_method"), None);
    }

    #[test]
    fn phones_skip_blank_numbers_and_default_their_label() {
        let fields = create_fields(&draft());

        assert_eq!(value(&fields, "telefonos[0][number]"), Some("987654321"));
        assert_eq!(value(&fields, "telefonos[0][description]"), Some("Personal"));
        assert_eq!(value(&fields, "telefonos[1][number]"), Some("061571234"));
        assert_eq!(value(&fields, "telefonos[1][description]"), Some("Tienda"));
        assert_eq!(value(&fields, "telefonos[2][number]"), None);
    }

    #[test]
    fn create_keeps_blank_identity_fields() {
        let mut draft = draft();
        draft.last_name = String::new();

        let fields = create_fields(&draft);

        assert_eq!(value(&fields, "apellidos"), Some(""));
    }

    #[test]
    fn update_omits_blank_fields_and_overrides_method() {
        let mut draft = draft();
        draft.last_name = " ".to_string();
        draft.district = None;

        let fields = update_fields(&draft);

        assert_eq!(fields.first(), Some(&("_method".to_string(), "PUT".to_string())));
        assert_eq!(value(&fields, "apellidos"), None);
        assert_eq!(value(&fields, "distritos"), None);
        assert_eq!(value(&fields, "nombre"), Some("Rosa"));
        assert_eq!(value(&fields, "tipoCliente"), Some("Mayorista"));
    }

    #[test]
    fn image_mime_follows_extension() {
        assert_eq!(image_mime(Path::new("fachada.JPG")), "image/jpeg");
        assert_eq!(image_mime(Path::new("/tmp/cliente.png")), "image/png");
        assert_eq!(image_mime(Path::new("notes")), "application/octet-stream");
    }
}
