//! Backend records.
//!
//! Response shapes of the backend's REST endpoints and their conversion into domain values.

use std::str::FromStr;

use bebidas::{
    bonuses::{BonusCondition, BonusProduct, BonusRule, RuleId, ScaleStep},
    customers::{Classification, Coordinates, Customer, FacadePhoto, Phone, TaxRegistration},
    products::Product,
};
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::api::errors::RecordError;

/// `GET products` response.
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub message: String,

    pub products: Vec<ProductRecord>,
}

/// Paginated `{"success", "data": {"data": [...]}}` envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,

    pub data: Page<T>,
}

#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
}

fn default_success() -> bool {
    true
}

/// Body of endpoints that answer with a confirmation message.
#[derive(Debug, Default, Deserialize)]
pub struct MessageResponse {
    pub message: Option<String>,
}

/// `GET customers/{id}/fotos-fachada` response.
#[derive(Debug, Deserialize)]
pub struct FacadePhotosResponse {
    #[serde(default = "default_success")]
    pub success: bool,

    #[serde(default)]
    pub data: Vec<FacadePhotoRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacadePhotoRecord {
    pub id_foto_fachada: u32,
    pub foto: String,
}

impl From<FacadePhotoRecord> for FacadePhoto {
    fn from(record: FacadePhotoRecord) -> Self {
        let file_name = record
            .foto
            .rsplit('/')
            .next()
            .unwrap_or(&record.foto)
            .to_string();

        Self {
            id: record.id_foto_fachada.into(),
            file_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id_producto: u32,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub presentacion: String,
    pub precio_unitario: Decimal,
    pub precio_mayorista: Decimal,
    #[serde(default)]
    pub stock: i64,
    #[serde(rename = "urlImage", default)]
    pub url_image: Option<String>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id_producto.into(),
            name: record.nombre,
            description: record.descripcion,
            presentation: record.presentacion,
            retail_price: record.precio_unitario,
            wholesale_price: record.precio_mayorista,
            stock: u32::try_from(record.stock.max(0)).unwrap_or(u32::MAX),
            image: record.url_image.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id_cliente: u32,
    #[serde(default)]
    pub codigo_cliente: String,
    pub nombre: String,
    #[serde(default)]
    pub apellidos: String,
    #[serde(default)]
    pub direccion: String,
    pub distritos: Option<String>,
    #[serde(default)]
    pub tipo_cliente: String,
    pub dni: Option<String>,
    pub ruc: Option<String>,
    pub razon_social: Option<String>,
    pub foto_cliente: Option<String>,
    pub telefonos: Option<Vec<PhoneRecord>>,
    pub coordenadas: Option<CoordinatesRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneRecord {
    pub numero: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CoordinatesRecord {
    pub latitud: f64,
    pub longitud: f64,
}

impl From<CustomerRecord> for Customer {
    fn from(record: CustomerRecord) -> Self {
        let business_name = non_blank(record.razon_social);

        Self {
            id: record.id_cliente.into(),
            code: record.codigo_cliente,
            first_name: record.nombre,
            last_name: record.apellidos,
            address: record.direccion,
            district: non_blank(record.distritos),
            classification: Classification::from_label(&record.tipo_cliente),
            dni: non_blank(record.dni),
            tax: non_blank(record.ruc).map(|ruc| TaxRegistration { ruc, business_name }),
            phones: record
                .telefonos
                .unwrap_or_default()
                .into_iter()
                .map(|phone| Phone {
                    number: phone.numero,
                    description: phone.description,
                })
                .collect(),
            coordinates: record.coordenadas.map(|c| Coordinates {
                latitude: c.latitud,
                longitude: c.longitud,
            }),
            photo: non_blank(record.foto_cliente),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusRuleRecord {
    pub id_bonificacion: u32,
    pub nombre: String,
    #[serde(rename = "tipo_bonificacion")]
    pub tipo_bonificacion: String,
    pub productos_requeridos: Option<Vec<u32>>,
    #[serde(rename = "idProducto_requerido")]
    pub id_producto_requerido: Option<u32>,
    #[serde(rename = "cantidad_minima")]
    pub cantidad_minima: Option<u32>,
    #[serde(rename = "precio_minimo")]
    pub precio_minimo: Option<String>,
    #[serde(rename = "idProducto_bonificacion")]
    pub id_producto_bonificacion: u32,
    #[serde(rename = "cantidad_bonificacion")]
    pub cantidad_bonificacion: u32,
    #[serde(rename = "producto_bonificacion")]
    pub producto_bonificacion: Option<BonusProductRecord>,
    #[serde(rename = "escalas_cantidad")]
    pub escalas_cantidad: Option<Vec<ScaleRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusProductRecord {
    pub id_producto: u32,
    pub nombre: String,
    pub precio_unitario: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ScaleRecord {
    pub cantidad_minima: u32,
    pub bonificacion: u32,
    pub paquetes: Option<u32>,
    pub tipo_unidad: Option<String>,
}

impl TryFrom<BonusRuleRecord> for BonusRule {
    type Error = RecordError;

    fn try_from(record: BonusRuleRecord) -> Result<Self, Self::Error> {
        let rule = RuleId::new(record.id_bonificacion);

        let missing = |field| RecordError::MissingField { rule, field };

        let condition = match record.tipo_bonificacion.trim().to_lowercase().as_str() {
            "producto" => BonusCondition::PerProductThreshold {
                product: record
                    .id_producto_requerido
                    .ok_or_else(|| missing("idProducto_requerido"))?
                    .into(),
                min_quantity: record
                    .cantidad_minima
                    .ok_or_else(|| missing("cantidad_minima"))?,
            },
            "cantidad" => BonusCondition::VolumeThreshold {
                products: record
                    .productos_requeridos
                    .ok_or_else(|| missing("productosRequeridos"))?
                    .into_iter()
                    .map(Into::into)
                    .collect::<FxHashSet<_>>(),
                scales: record
                    .escalas_cantidad
                    .ok_or_else(|| missing("escalas_cantidad"))?
                    .into_iter()
                    .map(|scale| ScaleStep {
                        min_quantity: scale.cantidad_minima,
                        bonus: scale.bonificacion,
                        packages: scale.paquetes,
                        unit_kind: scale.tipo_unidad,
                    })
                    .collect(),
            },
            "precio" => {
                let raw = record
                    .precio_minimo
                    .ok_or_else(|| missing("precio_minimo"))?;

                let min_spend =
                    Decimal::from_str(raw.trim()).map_err(|_| RecordError::InvalidField {
                        rule,
                        field: "precio_minimo",
                        value: raw,
                    })?;

                BonusCondition::SpendThreshold {
                    product: record
                        .id_producto_requerido
                        .ok_or_else(|| missing("idProducto_requerido"))?
                        .into(),
                    min_spend,
                }
            }
            _ => {
                return Err(RecordError::UnknownRuleType {
                    rule,
                    kind: record.tipo_bonificacion,
                });
            }
        };

        let bonus_product = match record.producto_bonificacion {
            Some(product) => BonusProduct {
                id: product.id_producto.into(),
                name: product.nombre,
                reference_price: product.precio_unitario,
            },
            None => BonusProduct {
                id: record.id_producto_bonificacion.into(),
                name: format!("Producto {}", record.id_producto_bonificacion),
                reference_price: Decimal::ZERO,
            },
        };

        Ok(Self {
            id: rule,
            name: record.nombre,
            bonus_product,
            bonus_quantity: record.cantidad_bonificacion,
            condition,
        })
    }
}

#[cfg(test)]
mod tests {
    use bebidas::products::ProductId;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn decodes_product_listing() -> TestResult {
        let body = r#"{
            "message": "ok",
            "products": [{
                "idProducto": 3,
                "nombre": "Inca Kola 500ml",
                "descripcion": "Gaseosa",
                "presentacion": "Paquete x 12",
                "precioUnitario": 2.5,
                "precioMayorista": "2.10",
                "stock": 120,
                "urlImage": "/img/productos/inca.png"
            }]
        }"#;

        let response: ProductsResponse = serde_json::from_str(body)?;
        let products: Vec<Product> = response.products.into_iter().map(Product::from).collect();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, ProductId::new(3));
        assert_eq!(products[0].retail_price, dec!(2.5));
        assert_eq!(products[0].wholesale_price, dec!(2.10));
        assert_eq!(products[0].stock, 120);
        assert_eq!(products[0].image, "/img/productos/inca.png");

        Ok(())
    }

    #[test]
    fn negative_stock_is_zero() -> TestResult {
        let record: ProductRecord = serde_json::from_str(
            r#"{"idProducto": 1, "nombre": "A", "precioUnitario": 1, "precioMayorista": 1, "stock": -4}"#,
        )?;

        assert_eq!(Product::from(record).stock, 0);

        Ok(())
    }

    #[test]
    fn decodes_customer_envelope() -> TestResult {
        let body = r#"{
            "success": true,
            "data": {"data": [{
                "idCliente": 8,
                "codigoCliente": "CLI-008",
                "nombre": "Rosa",
                "apellidos": "Quispe",
                "direccion": "Av. Grau 123",
                "distritos": "Ate",
                "tipoCliente": "Mayorista",
                "dni": "45678912",
                "ruc": "20123456789",
                "razonSocial": "Bodega Rosa SAC",
                "fotoCliente": null,
                "telefonos": [{"idTelefono": 1, "numero": "987654321", "description": "Personal"}],
                "coordenadas": {"latitud": -12.04, "longitud": -77.03}
            }]}
        }"#;

        let envelope: Envelope<CustomerRecord> = serde_json::from_str(body)?;
        assert!(envelope.success);

        let customers: Vec<Customer> = envelope.data.data.into_iter().map(Customer::from).collect();
        let customer = &customers[0];

        assert_eq!(customer.classification, Classification::Wholesale);
        assert_eq!(customer.dni.as_deref(), Some("45678912"));
        assert_eq!(
            customer.tax.as_ref().map(|tax| tax.ruc.as_str()),
            Some("20123456789")
        );
        assert_eq!(customer.phones.len(), 1);
        assert_eq!(customer.photo, None);
        assert!(customer.coordinates.is_some());

        Ok(())
    }

    #[test]
    fn blank_ruc_means_no_tax_registration() -> TestResult {
        let record: CustomerRecord = serde_json::from_str(
            r#"{"idCliente": 2, "nombre": "Luis", "tipoCliente": "Minorista", "dni": "1", "ruc": " "}"#,
        )?;

        let customer = Customer::from(record);

        assert_eq!(customer.tax, None);
        assert_eq!(customer.classification, Classification::Retail);

        Ok(())
    }

    fn rule_record(body: &str) -> Result<BonusRuleRecord, serde_json::Error> {
        serde_json::from_str(body)
    }

    #[test]
    fn converts_per_product_rule() -> TestResult {
        let rule = BonusRule::try_from(rule_record(
            r#"{
                "idBonificacion": 1,
                "nombre": "10 + 1",
                "tipo_bonificacion": "producto",
                "idProducto_requerido": 4,
                "cantidad_minima": 10,
                "idProducto_bonificacion": 4,
                "cantidad_bonificacion": 1,
                "producto_bonificacion": {"idProducto": 4, "nombre": "Agua", "precioUnitario": 1.2}
            }"#,
        )?)?;

        assert_eq!(
            rule.condition,
            BonusCondition::PerProductThreshold {
                product: ProductId::new(4),
                min_quantity: 10,
            }
        );
        assert_eq!(rule.bonus_product.name, "Agua");
        assert_eq!(rule.bonus_quantity, 1);

        Ok(())
    }

    #[test]
    fn converts_volume_rule_with_scales() -> TestResult {
        let rule = BonusRule::try_from(rule_record(
            r#"{
                "idBonificacion": 2,
                "nombre": "Mix",
                "tipo_bonificacion": "cantidad",
                "productosRequeridos": [1, 2],
                "idProducto_bonificacion": 9,
                "cantidad_bonificacion": 5,
                "escalas_cantidad": [
                    {"cantidad_minima": 50, "bonificacion": 5, "paquetes": 1, "tipo_unidad": "paquete"},
                    {"cantidad_minima": 100, "bonificacion": 12}
                ]
            }"#,
        )?)?;

        let BonusCondition::VolumeThreshold { products, scales } = &rule.condition else {
            panic!("expected a volume condition");
        };

        assert_eq!(products.len(), 2);
        assert_eq!(scales.len(), 2);
        assert_eq!(scales[0].min_quantity, 50);
        assert_eq!(scales[0].unit_kind.as_deref(), Some("paquete"));
        assert_eq!(rule.bonus_product.name, "Producto 9");

        Ok(())
    }

    #[test]
    fn converts_spend_rule_from_string_amount() -> TestResult {
        let rule = BonusRule::try_from(rule_record(
            r#"{
                "idBonificacion": 3,
                "nombre": "Compra 200",
                "tipo_bonificacion": "precio",
                "idProducto_requerido": 1,
                "precio_minimo": "200.00",
                "idProducto_bonificacion": 2,
                "cantidad_bonificacion": 3
            }"#,
        )?)?;

        assert_eq!(
            rule.condition,
            BonusCondition::SpendThreshold {
                product: ProductId::new(1),
                min_spend: dec!(200.00),
            }
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_rule_type() -> TestResult {
        let result = BonusRule::try_from(rule_record(
            r#"{
                "idBonificacion": 4,
                "nombre": "Raro",
                "tipo_bonificacion": "descuento",
                "idProducto_bonificacion": 2,
                "cantidad_bonificacion": 3
            }"#,
        )?);

        assert_eq!(
            result,
            Err(RecordError::UnknownRuleType {
                rule: RuleId::new(4),
                kind: "descuento".to_string(),
            })
        );

        Ok(())
    }

    #[test]
    fn rejects_rule_missing_required_field() -> TestResult {
        let result = BonusRule::try_from(rule_record(
            r#"{
                "idBonificacion": 5,
                "nombre": "Sin minimo",
                "tipo_bonificacion": "producto",
                "idProducto_requerido": 1,
                "idProducto_bonificacion": 2,
                "cantidad_bonificacion": 3
            }"#,
        )?);

        assert_eq!(
            result,
            Err(RecordError::MissingField {
                rule: RuleId::new(5),
                field: "cantidad_minima",
            })
        );

        Ok(())
    }

    #[test]
    fn rejects_unparseable_spend() -> TestResult {
        let result = BonusRule::try_from(rule_record(
            r#"{
                "idBonificacion": 6,
                "nombre": "Roto",
                "tipo_bonificacion": "precio",
                "idProducto_requerido": 1,
                "precio_minimo": "doscientos",
                "idProducto_bonificacion": 2,
                "cantidad_bonificacion": 3
            }"#,
        )?);

        assert!(matches!(result, Err(RecordError::InvalidField { .. })));

        Ok(())
    }

    #[test]
    fn decodes_facade_photos_keeping_file_names() -> TestResult {
        let body = r#"{
            "success": true,
            "data": [
                {"idFotoFachada": 4, "foto": "fotos_fachada/cliente_8_1.jpg"},
                {"idFotoFachada": 5, "foto": "cliente_8_2.png"}
            ]
        }"#;

        let response: FacadePhotosResponse = serde_json::from_str(body)?;

        assert!(response.success);

        let photos: Vec<FacadePhoto> = response.data.into_iter().map(FacadePhoto::from).collect();

        assert_eq!(photos[0].id, bebidas::customers::FacadePhotoId::new(4));
        assert_eq!(photos[0].file_name, "cliente_8_1.jpg");
        assert_eq!(photos[1].file_name, "cliente_8_2.png");

        Ok(())
    }
}
