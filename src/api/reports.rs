use chrono::Utc;
use itertools::Itertools;
use log::info;
use rocket::http::{ContentType, Header};
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{Request, Response, State};
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::openapi;
use rocket_okapi::response::OpenApiResponderInner;

use crate::access::{squad_member_ids, Caller};
use crate::api::{Error, Services};
use crate::dto::ExportRequest;
use crate::report::{build_rows, report_filename, to_csv};

/// A CSV body served as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFile {
    pub filename: String,
    pub body: String,
}

impl<'r> Responder<'r, 'static> for CsvFile {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        Response::build_from(self.body.respond_to(req)?)
            .header(ContentType::CSV)
            .header(Header::new(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            ))
            .ok()
    }
}

impl OpenApiResponderInner for CsvFile {
    fn responses(gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        <String as OpenApiResponderInner>::responses(gen)
    }
}

/// # Export report
/// Rounds of a squad (or every squad the caller may see) as a CSV download.
/// Admins only.
#[openapi(tag = "Reports")]
#[post("/reports/export", data = "<request>")]
pub fn export(caller: Caller, services: &State<Services>, request: Json<ExportRequest>) -> Result<CsvFile, Error> {
    if !caller.can_export_reports() {
        return Err(Error::Forbidden(caller.user_id));
    }

    let (squad_name, members) = match &request.squad_id {
        Some(squad_id) => {
            let squad = request
                .squads
                .iter()
                .find(|squad| squad.id == *squad_id)
                .ok_or_else(|| Error::SquadNotFound(squad_id.clone()))?;
            if !caller.can_view_squad(squad_id, &request.admin_squads) {
                return Err(Error::Forbidden(caller.user_id));
            }
            (
                Some(squad.name.as_str()),
                Some(squad_member_ids(squad_id, &request.squad_members)),
            )
        }
        None if caller.role.is_super_admin() => (None, None),
        None => {
            let members = caller
                .visible_squads(&request.squads, &request.admin_squads)
                .into_iter()
                .flat_map(|squad| squad_member_ids(&squad.id, &request.squad_members))
                .unique()
                .collect_vec();
            (None, Some(members))
        }
    };

    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let rows = build_rows(
        &request.filter(members),
        date,
        services.config.report_max_days,
        &request.rounds,
        &request.profiles,
        &request.courses,
    )?;
    info!("{} exported {} report rows", caller.user_id, rows.len());
    Ok(CsvFile {
        filename: report_filename(squad_name, date),
        body: to_csv(&rows),
    })
}
