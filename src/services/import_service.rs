// src/services/import_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use csv::StringRecord;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        AssetRepository, BranchRepository, FamilyGroupRepository, FarmerRepository,
        LookupRepository, UserRepository,
        lookup_repo::{DEFAULT_ASSET_TYPE_ID, LEASED_CATEGORY_ID},
    },
    models::{
        asset::Asset,
        auth::Role,
        family_group::{Cultivation, FamilyGroup},
        farmer::{Farmer, FarmerStatus},
        import::{ImportJobStatus, ImportKind, RowError},
    },
};

// Matrícula reservada para bens arrendados cujo dono não está na base.
const UNKNOWN_OWNER: &str = "-1";

// Marcador de técnico ausente no arquivo de carga.
const NO_TECHNICIAN: &str = "SEM TECNICO";

// Situação dos jobs de importação em andamento, consultável por id.
#[derive(Clone, Default)]
pub struct ImportJobRegistry {
    jobs: Arc<RwLock<HashMap<Uuid, ImportJobStatus>>>,
}

impl ImportJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self) -> Uuid {
        let job_id = Uuid::new_v4();
        self.jobs
            .write()
            .await
            .insert(job_id, ImportJobStatus::Pending);
        job_id
    }

    pub async fn set(&self, job_id: Uuid, status: ImportJobStatus) {
        self.jobs.write().await.insert(job_id, status);
    }

    pub async fn get(&self, job_id: Uuid) -> Option<ImportJobStatus> {
        self.jobs.read().await.get(&job_id).cloned()
    }
}

// Acumulado de um job: linhas processadas, puladas e os erros por linha.
#[derive(Default)]
struct ImportReport {
    processed: u64,
    skipped: u64,
    row_errors: Vec<RowError>,
}

impl ImportReport {
    fn skip(&mut self, line: u64, message: impl Into<String>) {
        self.skipped += 1;
        self.row_errors.push(RowError {
            line,
            message: message.into(),
        });
    }

    fn into_status(self) -> ImportJobStatus {
        ImportJobStatus::Completed {
            processed: self.processed,
            skipped: self.skipped,
            row_errors: self.row_errors,
        }
    }
}

#[derive(Clone)]
pub struct ImportService {
    pool: PgPool,
    registry: ImportJobRegistry,
    farmers: FarmerRepository,
    groups: FamilyGroupRepository,
    assets: AssetRepository,
    users: UserRepository,
    branches: BranchRepository,
    lookups: LookupRepository,
}

impl ImportService {
    pub fn new(pool: PgPool, registry: ImportJobRegistry) -> Self {
        Self {
            pool,
            registry,
            farmers: FarmerRepository::new(),
            groups: FamilyGroupRepository::new(),
            assets: AssetRepository::new(),
            users: UserRepository::new(),
            branches: BranchRepository::new(),
            lookups: LookupRepository::new(),
        }
    }

    pub async fn job_status(&self, job_id: Uuid) -> Option<ImportJobStatus> {
        self.registry.get(job_id).await
    }

    /// Dispara a importação em background e devolve o id do job. A rotina
    /// é escolhida pelo nome do arquivo enviado.
    pub async fn start(&self, filename: &str, bytes: Vec<u8>) -> Result<Uuid, AppError> {
        let kind = ImportKind::from_filename(filename).ok_or_else(|| {
            AppError::bad_request(format!(
                "Arquivo '{}' não reconhecido. Esperado data.csv, farmer_update.csv ou assets.csv.",
                filename
            ))
        })?;

        let job_id = self.registry.register().await;

        let service = self.clone();
        tokio::spawn(async move {
            service.registry.set(job_id, ImportJobStatus::Running).await;

            let result = match kind {
                ImportKind::FarmerData => service.run_farmer_data(&bytes).await,
                ImportKind::FarmerUpdate => service.run_farmer_update(&bytes).await,
                ImportKind::Assets => service.run_assets(&bytes).await,
            };

            let status = match result {
                Ok(report) => {
                    tracing::info!(
                        job_id = %job_id,
                        processed = report.processed,
                        skipped = report.skipped,
                        "Importação concluída"
                    );
                    report.into_status()
                }
                Err(e) => {
                    tracing::error!(job_id = %job_id, "Importação falhou: {}", e);
                    ImportJobStatus::Failed {
                        message: e.to_string(),
                    }
                }
            };

            service.registry.set(job_id, status).await;
        });

        Ok(job_id)
    }

    /// data.csv em duas passadas: primeiro os produtores (com técnico e
    /// carteira), depois os grupos familiares e as áreas de cultivo.
    async fn run_farmer_data(&self, bytes: &[u8]) -> Result<ImportReport, AppError> {
        let mut report = ImportReport::default();

        let mut reader = csv_reader(bytes);
        for record in reader.records() {
            let record = record.map_err(|e| AppError::bad_request(e.to_string()))?;
            let line = line_of(&record);

            match self.import_farmer_row(&record).await {
                Ok(()) => report.processed += 1,
                Err(e) => report.skip(line, e.to_string()),
            }
        }

        let mut reader = csv_reader(bytes);
        for record in reader.records() {
            let record = record.map_err(|e| AppError::bad_request(e.to_string()))?;
            let line = line_of(&record);

            if let Err(e) = self.import_family_group_row(&record).await {
                report.skip(line, e.to_string());
            }
        }

        Ok(report)
    }

    async fn import_farmer_row(&self, record: &StringRecord) -> Result<(), AppError> {
        let registration = required(record, 0, "matrícula")?;
        let name = required(record, 1, "nome")?;
        let status = if field(record, 2).eq_ignore_ascii_case("normal") {
            FarmerStatus::Active
        } else {
            FarmerStatus::Deceased
        };
        let owned_area = parse_area(field(record, 6))?;
        let leased_area = parse_area(field(record, 7))?;

        let mut tx = self.pool.begin().await?;

        let technician_id = match field(record, 5) {
            "" | NO_TECHNICIAN => None,
            technician_name => Some(
                self.find_or_create_technician(&mut tx, technician_name)
                    .await?,
            ),
        };

        let branch_id = match field(record, 14) {
            "" => None,
            branch_name => Some(self.find_or_create_branch(&mut tx, branch_name).await?),
        };

        let family_group_id = match self.farmers.find_by_id(&mut *tx, &registration).await? {
            Some(current) => {
                let farmer = Farmer {
                    name,
                    status,
                    owned_area,
                    leased_area,
                    technician_id,
                    branch_id,
                    ..current
                };
                self.farmers.update(&mut *tx, &farmer).await?;
                farmer.family_group_id
            }
            None => {
                let farmer = Farmer {
                    registration_number: registration.clone(),
                    name,
                    status,
                    blocked: false,
                    owned_area,
                    leased_area,
                    family_group_id: None,
                    branch_id,
                    technician_id,
                    type_id: None,
                };
                self.farmers.insert(&mut *tx, &farmer).await?;
                None
            }
        };

        // O produtor que se declara principal e está sem grupo ganha o grupo
        // solo já na primeira passada. Quem pertence a outro grupo fica onde
        // está.
        if needs_solo_group(&registration, field(record, 3), family_group_id) {
            let group = match self.groups.find_by_principal(&mut *tx, &registration).await? {
                Some(group) => group,
                None => self.groups.create(&mut *tx, &registration, None).await?,
            };
            self.farmers
                .set_family_group(&mut *tx, &registration, Some(group.id))
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn import_family_group_row(&self, record: &StringRecord) -> Result<(), AppError> {
        let registration = required(record, 0, "matrícula")?;
        let principal = field(record, 3);
        if principal.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        let principal_farmer = self
            .farmers
            .find_by_id(&mut *tx, principal)
            .await?
            .ok_or_else(|| {
                AppError::bad_request(format!("Produtor principal '{}' não existe.", principal))
            })?;

        // A segunda passada nunca cria grupos: quem não ganhou o seu na
        // primeira passada gera erro de linha e a linha é pulada.
        let group = principal_group(
            self.groups.find_by_principal(&mut *tx, principal).await?,
            principal,
        )?;

        if principal_farmer.family_group_id.is_none() {
            self.farmers
                .set_family_group(&mut *tx, principal, Some(group.id))
                .await?;
        }

        if registration != principal {
            let member = self
                .farmers
                .find_by_id(&mut *tx, &registration)
                .await?
                .ok_or_else(|| {
                    AppError::bad_request(format!("Produtor '{}' não existe.", registration))
                })?;
            if member.family_group_id.is_none() {
                self.farmers
                    .set_family_group(&mut *tx, &registration, Some(group.id))
                    .await?;
            }
        }

        // Cada linha soma suas áreas de cultivo no grupo do principal.
        let cultivation = Cultivation {
            canola_area: parse_area(field(record, 8))?,
            wheat_area: parse_area(field(record, 9))?,
            corn_silage_area: parse_area(field(record, 10))?,
            grain_corn_area: parse_area(field(record, 11))?,
            bean_area: parse_area(field(record, 12))?,
            soybean_area: parse_area(field(record, 13))?,
            canola_area_participation: 0.0,
            wheat_area_participation: 0.0,
            corn_silage_area_participation: 0.0,
            grain_corn_area_participation: 0.0,
            bean_area_participation: 0.0,
            soybean_area_participation: 0.0,
        };
        self.groups
            .add_cultivations(&mut *tx, group.id, &cultivation)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// farmer_update.csv: tipo do produtor, falecimento e bloqueio.
    /// Produtores do tipo 1 não são alterados pela carga.
    async fn run_farmer_update(&self, bytes: &[u8]) -> Result<ImportReport, AppError> {
        let mut report = ImportReport::default();

        let mut reader = csv_reader(bytes);
        for record in reader.records() {
            let record = record.map_err(|e| AppError::bad_request(e.to_string()))?;
            let line = line_of(&record);

            match self.import_farmer_update_row(&record).await {
                Ok(true) => report.processed += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => report.skip(line, e.to_string()),
            }
        }

        Ok(report)
    }

    async fn import_farmer_update_row(&self, record: &StringRecord) -> Result<bool, AppError> {
        let registration = required(record, 0, "matrícula")?;

        let mut tx = self.pool.begin().await?;

        let mut farmer = self
            .farmers
            .find_by_id(&mut *tx, &registration)
            .await?
            .ok_or_else(|| {
                AppError::bad_request(format!("Produtor '{}' não existe.", registration))
            })?;

        if farmer.type_id == Some(1) {
            return Ok(false);
        }

        if let Some(type_id) = parse_farmer_type(field(record, 2)) {
            if self
                .lookups
                .find_farmer_type(&mut *tx, type_id)
                .await?
                .is_some()
            {
                farmer.type_id = Some(type_id);
            }
        }

        if parse_death_date(field(record, 3))?.is_some() {
            farmer.status = FarmerStatus::Deceased;
        }

        farmer.blocked = apply_blocked_flag(farmer.blocked, field(record, 4));

        self.farmers.update(&mut *tx, &farmer).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// assets.csv: bens próprios e arrendados. Na categoria "Arrendado" o
    /// dono real vem da coluna alternativa; sem ela, entra o dono
    /// desconhecido ("-1") e o produtor do arquivo fica como arrendatário.
    async fn run_assets(&self, bytes: &[u8]) -> Result<ImportReport, AppError> {
        let mut report = ImportReport::default();

        let mut reader = csv_reader(bytes);
        for record in reader.records() {
            let record = record.map_err(|e| AppError::bad_request(e.to_string()))?;
            let line = line_of(&record);

            match self.import_asset_row(&record).await {
                Ok(()) => report.processed += 1,
                Err(e) => report.skip(line, e.to_string()),
            }
        }

        Ok(report)
    }

    async fn import_asset_row(&self, record: &StringRecord) -> Result<(), AppError> {
        let primary = required(record, 0, "matrícula")?;
        let description = field(record, 3).to_string();
        let amount = parse_area(field(record, 5))?;
        let address = field(record, 6).to_string();
        let category_id = field(record, 4).parse::<i64>().ok();
        let alt = field(record, 7);

        let mut tx = self.pool.begin().await?;

        self.farmers
            .find_by_id(&mut *tx, &primary)
            .await?
            .ok_or_else(|| AppError::bad_request(format!("Produtor '{}' não existe.", primary)))?;

        let type_id = match field(record, 2).parse::<i64>().ok() {
            Some(type_id)
                if self
                    .lookups
                    .find_asset_type(&mut *tx, type_id)
                    .await?
                    .is_some() =>
            {
                type_id
            }
            _ => DEFAULT_ASSET_TYPE_ID,
        };

        let (owner, leased_to) = if category_id == Some(LEASED_CATEGORY_ID) {
            let owner = if !alt.is_empty()
                && self.farmers.find_by_id(&mut *tx, alt).await?.is_some()
            {
                alt.to_string()
            } else {
                UNKNOWN_OWNER.to_string()
            };
            (owner, Some(primary.clone()))
        } else {
            (primary.clone(), None)
        };

        let id_sap = match field(record, 1).parse::<i64>() {
            Ok(id_sap) => id_sap,
            Err(_) => self.assets.next_id_sap(&mut *tx, &owner).await?,
        };

        let asset = Asset {
            owner_registration: owner.clone(),
            id_sap,
            description,
            address,
            amount,
            cultivable_area: 0.0,
            asset_type_id: Some(type_id),
            asset_category_id: category_id,
            leased_to,
        };

        match self.assets.find_by_id(&mut *tx, &owner, id_sap).await? {
            Some(_) => {
                self.assets.update(&mut *tx, &asset).await?;
            }
            None => {
                self.assets.insert(&mut *tx, &asset).await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Técnicos citados na carga viram usuários sem senha utilizável
    /// (hash "!"), que um administrador redefine depois.
    async fn find_or_create_technician(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        name: &str,
    ) -> Result<i64, AppError> {
        let username = generate_username(name);

        if let Some(user) = self.users.find_by_username(&mut **tx, &username).await? {
            return Ok(user.id);
        }

        let user = self
            .users
            .create(
                &mut **tx,
                &username,
                name,
                "!",
                &[Role::User, Role::Technician],
                None,
            )
            .await?;

        Ok(user.id)
    }

    async fn find_or_create_branch(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        name: &str,
    ) -> Result<i64, AppError> {
        if let Some(branch) = self.branches.find_by_name(&mut **tx, name).await? {
            return Ok(branch.id);
        }

        let branch = self.branches.create(&mut **tx, name).await?;
        Ok(branch.id)
    }
}

fn csv_reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn field<'r>(record: &'r StringRecord, index: usize) -> &'r str {
    record.get(index).map(str::trim).unwrap_or("")
}

fn required(record: &StringRecord, index: usize, label: &str) -> Result<String, AppError> {
    let value = field(record, index);
    if value.is_empty() {
        return Err(AppError::bad_request(format!("Campo '{}' vazio.", label)));
    }
    Ok(value.to_string())
}

/// Números no formato brasileiro: ponto de milhar e vírgula decimal.
fn parse_area(value: &str) -> Result<f64, AppError> {
    if value.is_empty() || value == "-" {
        return Ok(0.0);
    }

    let normalized = value.replace('.', "").replace(',', ".");
    normalized
        .parse()
        .map_err(|_| AppError::bad_request(format!("Área inválida: '{}'.", value)))
}

/// Tipo do produtor no formato "G001" (ou só o número).
fn parse_farmer_type(value: &str) -> Option<i32> {
    let digits = value.strip_prefix(['G', 'g']).unwrap_or(value);
    digits.parse().ok()
}

/// Data de falecimento dd.MM.yyyy. Os marcadores de "sem data" do legado
/// viram None.
fn parse_death_date(value: &str) -> Result<Option<NaiveDate>, AppError> {
    if value.is_empty() || value == "00-00-0000" || value == "00.00.0000" {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(value, "%d.%m.%Y")
        .map_err(|_| AppError::bad_request(format!("Data inválida: '{}'.", value)))?;

    Ok(Some(date))
}

/// Nome do técnico vira username: minúsculas e espaços por underscore.
fn generate_username(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

/// Linha de data.csv que cria grupo solo na primeira passada: o produtor se
/// declara seu próprio principal e ainda não pertence a grupo nenhum.
fn needs_solo_group(
    registration: &str,
    declared_principal: &str,
    family_group_id: Option<i64>,
) -> bool {
    registration == declared_principal && family_group_id.is_none()
}

/// Na segunda passada o grupo do principal precisa já existir.
fn principal_group(
    group: Option<FamilyGroup>,
    principal: &str,
) -> Result<FamilyGroup, AppError> {
    group.ok_or_else(|| {
        AppError::bad_request(format!(
            "Produtor principal '{}' não possui grupo familiar.",
            principal
        ))
    })
}

/// O arquivo de atualização só marca bloqueio; nunca desbloqueia quem já
/// estava bloqueado na base.
fn apply_blocked_flag(current: bool, value: &str) -> bool {
    current || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grupo_solo_apenas_para_principal_de_si_mesmo_sem_grupo() {
        assert!(needs_solo_group("Q", "Q", None));
        // Quem já pertence a um grupo fica onde está.
        assert!(!needs_solo_group("P", "P", Some(1)));
        // Principal declarado por terceiros não gera grupo na primeira passada.
        assert!(!needs_solo_group("Y", "P", None));
    }

    #[test]
    fn segunda_passada_rejeita_principal_sem_grupo() {
        let err = principal_group(None, "P").unwrap_err();
        assert!(err.to_string().contains("'P'"));
    }

    #[test]
    fn bloqueio_nunca_e_desfeito_pela_carga() {
        assert!(apply_blocked_flag(true, "0"));
        assert!(apply_blocked_flag(true, ""));
        assert!(apply_blocked_flag(false, "1"));
        assert!(!apply_blocked_flag(false, "0"));
    }

    #[test]
    fn area_com_virgula_decimal() {
        assert_eq!(parse_area("10,5").unwrap(), 10.5);
        assert_eq!(parse_area("1.234,56").unwrap(), 1234.56);
        assert_eq!(parse_area("").unwrap(), 0.0);
        assert_eq!(parse_area("-").unwrap(), 0.0);
        assert!(parse_area("abc").is_err());
    }

    #[test]
    fn tipo_do_produtor_com_prefixo_g() {
        assert_eq!(parse_farmer_type("G001"), Some(1));
        assert_eq!(parse_farmer_type("G012"), Some(12));
        assert_eq!(parse_farmer_type("3"), Some(3));
        assert_eq!(parse_farmer_type(""), None);
        assert_eq!(parse_farmer_type("GX"), None);
    }

    #[test]
    fn data_de_falecimento_e_marcadores() {
        assert_eq!(parse_death_date("00-00-0000").unwrap(), None);
        assert_eq!(parse_death_date("00.00.0000").unwrap(), None);
        assert_eq!(parse_death_date("").unwrap(), None);
        assert_eq!(
            parse_death_date("15.03.2021").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 15)
        );
        assert!(parse_death_date("2021-03-15").is_err());
    }

    #[test]
    fn username_do_tecnico() {
        assert_eq!(generate_username("João da Silva"), "joão_da_silva");
        assert_eq!(generate_username("  Maria  Souza "), "maria_souza");
    }

    #[tokio::test]
    async fn registro_de_jobs_guarda_a_situacao() {
        let registry = ImportJobRegistry::new();
        let job_id = registry.register().await;

        assert!(matches!(
            registry.get(job_id).await,
            Some(ImportJobStatus::Pending)
        ));

        registry.set(job_id, ImportJobStatus::Running).await;
        assert!(matches!(
            registry.get(job_id).await,
            Some(ImportJobStatus::Running)
        ));

        assert!(registry.get(Uuid::new_v4()).await.is_none());
    }

    #[test]
    fn linha_do_csv_escolhe_as_colunas() {
        let mut reader = csv_reader(
            b"header\nREG1;Fulano de Tal;Normal;REG1;x;SEM TECNICO;10,0;5,0;0;0;0;0;0;0;Carteira A\n",
        );
        let record = reader.records().next().unwrap().unwrap();

        assert_eq!(field(&record, 0), "REG1");
        assert_eq!(field(&record, 1), "Fulano de Tal");
        assert_eq!(field(&record, 5), "SEM TECNICO");
        assert_eq!(parse_area(field(&record, 6)).unwrap(), 10.0);
        assert_eq!(field(&record, 14), "Carteira A");
        assert_eq!(field(&record, 20), "");
    }
}
