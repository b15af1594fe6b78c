//! Gallery image entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "gallery_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub image: String,
    #[sea_orm(nullable)]
    pub caption: Option<String>,
    pub upload_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain GalleryImage.
impl From<Model> for atelier_core::domain::GalleryImage {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            image: model.image,
            caption: model.caption,
            upload_date: model.upload_date.into(),
        }
    }
}

/// Conversion from Domain GalleryImage to SeaORM ActiveModel.
impl From<atelier_core::domain::GalleryImage> for ActiveModel {
    fn from(image: atelier_core::domain::GalleryImage) -> Self {
        Self {
            id: Set(image.id),
            image: Set(image.image),
            caption: Set(image.caption),
            upload_date: Set(image.upload_date.into()),
        }
    }
}
