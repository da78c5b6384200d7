// src/common/date_range.rs

use chrono::{
    DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeDelta, TimeZone, Utc,
};

// Último milissegundo do dia (23:59:59.999)
const END_OF_DAY_MILLIS: i64 = 86_399_999;

/// Janela de datas fechada `[start, end]` usada pelas métricas.
/// O fim é sempre tratado como o último instante do dia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        // Garante start <= end mesmo se alguém inverter os argumentos
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 23:59:59.999 (hora local) do último dia da janela.
    pub fn end_of_day(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN) + TimeDelta::milliseconds(END_OF_DAY_MILLIS)
    }

    /// O fim do dia local convertido para UTC, no formato ISO que os
    /// serviços de pedidos esperam (ex: 2026-10-19T23:59:59.999Z).
    pub fn end_of_day_utc(&self) -> DateTime<Utc> {
        let local = self.end_of_day();
        match Local.from_local_datetime(&local).earliest() {
            Some(dt) => dt.with_timezone(&Utc),
            // Horário inexistente (mudança de fuso): assume UTC
            None => local.and_utc(),
        }
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    pub fn end_of_day_param(&self) -> String {
        self.end_of_day_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Política de janela padrão de cada família de métricas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultRange {
    /// Apenas hoje (pedidos, faturamento).
    Today,
    /// Do dia 1 do mês corrente até hoje (financeiro).
    MonthToDate,
    /// Últimos N dias até hoje (ranking de itens).
    TrailingDays(u64),
}

impl DefaultRange {
    fn default_start(self, today: NaiveDate) -> NaiveDate {
        match self {
            DefaultRange::Today => today,
            DefaultRange::MonthToDate => today.with_day(1).unwrap_or(today),
            DefaultRange::TrailingDays(days) => {
                today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
            }
        }
    }
}

/// As datas pedidas pelo cliente + o "hoje" capturado uma única vez por relatório.
/// Cada fetcher resolve a própria janela a partir do mesmo valor, então
/// nenhuma métrica enxerga um "hoje" diferente da outra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub today: NaiveDate,
}

impl RangeRequest {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self { start, end, today }
    }

    pub fn resolve(&self, policy: DefaultRange) -> TimeWindow {
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, self.today.max(start)),
            (None, Some(end)) => (policy.default_start(self.today).min(end), end),
            (None, None) => (policy.default_start(self.today), self.today),
        };
        TimeWindow::new(start, end)
    }

    /// Data do fechamento de estoque: o fim pedido ou hoje.
    pub fn closing_date(&self) -> NaiveDate {
        self.end.unwrap_or(self.today)
    }
}
