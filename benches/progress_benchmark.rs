use chrono::{NaiveDate, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use monjaro_up::models::{DailyLog, OnboardingForm, Profile};
use monjaro_up::services::profile::{derive_targets, validate_onboarding};
use monjaro_up::services::progress::{evaluate_alerts, NutrientProgress};
use std::hint::black_box;

fn onboarded_profile() -> Profile {
    let form = OnboardingForm {
        main_goal: Some("Emagrecer com saúde".to_string()),
        appetite_level: Some("Zero fome mesmo".to_string()),
        protein_frequency: Some("Às vezes".to_string()),
        fiber_frequency: Some("Raramente".to_string()),
        energy_level: Some("Baixa".to_string()),
        nausea_experience: Some("Sim".to_string()),
        water_habit: Some("Esqueço bastante".to_string()),
        physical_activity: Some("Raramente".to_string()),
        difficulties: vec!["Beber água".to_string(), "Comer proteína".to_string()],
        notification_preference: Some("Só o essencial".to_string()),
        weight_kg: Some(92.4),
        treatment_status: Some("Sim".to_string()),
    };
    let answers = validate_onboarding(&form).expect("Fixture form must be valid");

    let mut profile = Profile::new("bench", None, None, Utc::now());
    profile.targets = derive_targets(answers.weight_kg);
    profile.onboarding = Some(answers);
    profile.onboarding_completed = true;
    profile
}

fn benchmark_daily_evaluation(c: &mut Criterion) {
    let profile = onboarded_profile();
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");

    // Sweep a day from nothing logged to every target exceeded.
    let logs: Vec<DailyLog> = (0..=20)
        .map(|step| {
            let mut log = DailyLog::empty("bench", date);
            log.protein_g = step as f64 * 8.0;
            log.water_ml = step as f64 * 150.0;
            log
        })
        .collect();

    let mut group = c.benchmark_group("daily_evaluation");

    group.bench_function("evaluate_alerts", |b| {
        b.iter(|| {
            for log in &logs {
                black_box(evaluate_alerts(black_box(&profile), black_box(log)));
            }
        })
    });

    group.bench_function("nutrient_progress", |b| {
        let target = f64::from(profile.targets.protein_g);
        b.iter(|| {
            for log in &logs {
                let _ = black_box(NutrientProgress::new(black_box(log.protein_g), target));
            }
        })
    });

    group.bench_function("validate_onboarding", |b| {
        let form = OnboardingForm {
            main_goal: Some("Ganhar disposição".to_string()),
            appetite_level: Some("Normal".to_string()),
            protein_frequency: Some("Sempre".to_string()),
            fiber_frequency: Some("Sempre".to_string()),
            energy_level: Some("Alta".to_string()),
            nausea_experience: Some("Não".to_string()),
            water_habit: Some("Sim".to_string()),
            physical_activity: Some("Sempre".to_string()),
            difficulties: vec!["Manter rotina".to_string()],
            notification_preference: Some("Sim, me ajuda".to_string()),
            weight_kg: Some(70.0),
            treatment_status: Some("Ainda não".to_string()),
        };
        b.iter(|| validate_onboarding(black_box(&form)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_daily_evaluation);
criterion_main!(benches);
