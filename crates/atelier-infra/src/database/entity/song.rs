//! Song entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "songs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub audio_file: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub lyrics: Option<String>,
    pub release_date: Date,
    pub upload_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Song.
impl From<Model> for atelier_core::domain::Song {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            artist: model.artist,
            audio_file: model.audio_file,
            lyrics: model.lyrics,
            release_date: model.release_date,
            upload_date: model.upload_date.into(),
        }
    }
}

/// Conversion from Domain Song to SeaORM ActiveModel.
impl From<atelier_core::domain::Song> for ActiveModel {
    fn from(song: atelier_core::domain::Song) -> Self {
        Self {
            id: Set(song.id),
            title: Set(song.title),
            artist: Set(song.artist),
            audio_file: Set(song.audio_file),
            lyrics: Set(song.lyrics),
            release_date: Set(song.release_date),
            upload_date: Set(song.upload_date.into()),
        }
    }
}
