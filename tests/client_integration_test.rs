use anyhow::Result;
use bigg_client::core::mapper::{DATABASE_LINKS, ESCHER_MAPS, MODELS_CONTAINING_REACTION, ORGANISM};
use bigg_client::{
    BiggClient, BiggError, EntityRegistry, LocalStorage, Metabolite, Model, ModelFormat, Reaction,
};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn client_for(server: &MockServer) -> BiggClient {
    BiggClient::with_urls(&server.url("/api/v2/"), &server.url("/static/models/")).unwrap()
}

fn mini_model() -> serde_json::Value {
    json!({
        "metabolites": [
            {"id": "glc__D_e", "name": "D-Glucose", "compartment": "e", "charge": 0, "formula": "C6H12O6", "notes": {}, "annotation": {"bigg.metabolite": ["glc__D"]}},
            {"id": "g6p_c", "name": "D-Glucose 6-phosphate", "compartment": "c", "charge": -2, "formula": "C6H11O9P", "notes": {}, "annotation": {}},
            {"id": "f6p_c", "name": "D-Fructose 6-phosphate", "compartment": "c", "charge": -2, "formula": "C6H11O9P", "notes": {}, "annotation": {}}
        ],
        "reactions": [
            {"id": "PGI", "name": "Glucose-6-phosphate isomerase", "metabolites": {"g6p_c": -1.0, "f6p_c": 1.0}, "lower_bound": -1000.0, "upper_bound": 1000.0, "gene_reaction_rule": "b4025", "subsystem": "Glycolysis/Gluconeogenesis", "notes": {"original_bigg_ids": ["PGI"]}, "annotation": {}},
            {"id": "EX_glc__D_e", "name": "D-Glucose exchange", "metabolites": {"glc__D_e": -1}, "lower_bound": -10, "upper_bound": 1000, "gene_reaction_rule": "", "objective_coefficient": 0}
        ],
        "genes": [
            {"id": "b4025", "name": "pgi", "notes": {}, "annotation": {}}
        ],
        "id": "mini_core",
        "compartments": {"c": "cytosol", "e": "extracellular space"},
        "version": "1"
    })
}

#[tokio::test]
async fn test_list_models_table() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/models");
        then.status(200).json_body(json!({
            "results_count": 2,
            "results": [
                {"bigg_id": "e_coli_core", "gene_count": 137, "reaction_count": 95, "organism": "Escherichia coli str. K-12 substr. MG1655", "metabolite_count": 72},
                {"bigg_id": "iMM904", "gene_count": 905, "reaction_count": 1577, "organism": "Saccharomyces cerevisiae S288C", "metabolite_count": 1226}
            ]
        }));
    });

    let table = client_for(&server).list_models().await?;

    api_mock.assert();
    assert_eq!(table.len(), 2);
    let csv = table.to_csv()?;
    assert!(csv.starts_with("bigg_id,metabolites,reactions,genes,organism\n"));
    assert!(csv.contains("iMM904,1226,1577,905,Saccharomyces cerevisiae S288C"));
    Ok(())
}

#[tokio::test]
async fn test_model_details_then_fetch_model() -> Result<()> {
    let server = MockServer::start();
    let details_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/models/mini_core");
        then.status(200).json_body(json!({
            "organism": "Escherichia coli",
            "gene_count": 1,
            "reaction_count": 2,
            "metabolite_count": 3,
            "escher_maps": [],
            "json_size": "2 kB",
            "xml_size": "5 kB",
            "mat_size": "3 kB",
            "xml_gz_size": "1 kB",
            "genome_name": "NC_000913.3",
            "last_updated": "2019-10-31 15:55:37.485722"
        }));
    });
    let file_mock = server.mock(|when, then| {
        when.method(GET).path("/static/models/mini_core.json");
        then.status(200).json_body(mini_model());
    });

    let client = client_for(&server);
    let summary = client.model_details("mini_core").await?;
    let model = summary.fetch_model(&client).await?;

    details_mock.assert();
    file_mock.assert();
    assert_eq!(summary.file_sizes.len(), 4);
    assert_eq!(model.id, "mini_core");
    assert_eq!(model.metabolites.len() as u64, summary.metabolites);
    assert_eq!(model.reactions.len() as u64, summary.reactions);
    assert_eq!(model.genes.len() as u64, summary.genes);
    Ok(())
}

#[tokio::test]
async fn test_download_model_in_every_format() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path().join("models"));
    let client = client_for(&server);

    for format in ModelFormat::ALL {
        let file_name = format.file_name("mini_core");
        let body = format!("contents of {}", file_name);
        let file_mock = server.mock(|when, then| {
            when.method(GET).path(format!("/static/models/{}", file_name));
            then.status(200).body(body.clone());
        });

        let path = client.download_model("mini_core", format, &storage).await?;

        file_mock.assert();
        assert_eq!(path, temp_dir.path().join("models").join(&file_name));
        assert!(path.is_file());
        assert_eq!(std::fs::read_to_string(&path)?, body);
    }
    Ok(())
}

#[tokio::test]
async fn test_download_unknown_model_writes_nothing() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/static/models/nope.json");
        then.status(404);
    });
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());

    let err = client_for(&server)
        .download_model("nope", ModelFormat::Json, &storage)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_failed_write_leaves_no_partial_file() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/static/models/mini_core.json");
        then.status(200).json_body(mini_model());
    });
    let temp_dir = TempDir::new()?;
    let occupied = temp_dir.path().join("mini_core.json");
    std::fs::create_dir(&occupied)?;
    std::fs::write(occupied.join("keep.txt"), "keep")?;
    let storage = LocalStorage::new(temp_dir.path());

    let err = client_for(&server)
        .download_model("mini_core", ModelFormat::Json, &storage)
        .await
        .unwrap_err();

    assert!(matches!(err, BiggError::Io(_)));
    let names: Vec<String> = std::fs::read_dir(temp_dir.path())?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(names, vec!["mini_core.json".to_string()]);
    assert!(occupied.join("keep.txt").is_file());
    Ok(())
}

#[tokio::test]
async fn test_downloaded_model_round_trips() -> Result<()> {
    let server = MockServer::start();
    let original = serde_json::to_vec(&mini_model())?;
    let file_mock = server.mock(|when, then| {
        when.method(GET).path("/static/models/mini_core.json");
        then.status(200).body(original.clone());
    });

    let temp_dir = TempDir::new()?;
    let client = client_for(&server);

    let first = client
        .download_model("mini_core", ModelFormat::Json, &LocalStorage::new(temp_dir.path().join("a")))
        .await?;
    let second = client
        .download_model("mini_core", ModelFormat::Json, &LocalStorage::new(temp_dir.path().join("b")))
        .await?;
    file_mock.assert_hits(2);
    assert_eq!(std::fs::read(&first)?, std::fs::read(&second)?);

    let model = Model::from_json_slice(&std::fs::read(&first)?)?;
    let rewritten = model.to_json_string()?;
    let reparsed = Model::from_json_slice(rewritten.as_bytes())?;
    assert_eq!(reparsed, model);

    // unknown keys survive the trip
    let value: serde_json::Value = serde_json::from_str(&rewritten)?;
    assert_eq!(value["version"], json!("1"));
    assert_eq!(value["reactions"][0]["notes"]["original_bigg_ids"], json!(["PGI"]));
    assert_eq!(value["compartments"]["e"], json!("extracellular space"));
    Ok(())
}

#[tokio::test]
async fn test_reaction_listing_and_lookup() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/models/e_coli_core/reactions");
        then.status(200).json_body(json!({
            "results_count": 2,
            "results": [
                {"bigg_id": "PFK", "name": "Phosphofructokinase", "model_bigg_id": "e_coli_core", "organism": "Escherichia coli"},
                {"bigg_id": "PGI", "name": "Glucose-6-phosphate isomerase", "model_bigg_id": "e_coli_core", "organism": "Escherichia coli"}
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/universal/reactions/PGI");
        then.status(200).json_body(json!({
            "bigg_id": "PGI",
            "name": "Glucose-6-phosphate isomerase",
            "pseudoreaction": false,
            "database_links": {"EC Number": [{"link": "http://identifiers.org/ec-code/5.3.1.9", "id": "5.3.1.9"}]},
            "metabolites": [
                {"bigg_id": "g6p", "name": "D-Glucose 6-phosphate", "compartment_bigg_id": "c", "stoichiometry": -1},
                {"bigg_id": "f6p", "name": "D-Fructose 6-phosphate", "compartment_bigg_id": "c", "stoichiometry": 1}
            ],
            "models_containing_reaction": [{"bigg_id": "e_coli_core", "organism": "Escherichia coli"}]
        }));
    });

    let client = client_for(&server);
    let reactions = client.list_model_reactions("e_coli_core").await?;
    assert_eq!(reactions.len(), 2);

    let mut registry = EntityRegistry::new();
    let mut g6p = Metabolite::new("g6p", "D-Glucose 6-phosphate");
    g6p.formula = Some("C6H11O9P".to_string());
    registry.add_metabolite(g6p);

    let reaction = client.get_reaction(&reactions[1].id, &registry).await?;
    assert_eq!(reaction.id, reactions[1].id);
    assert_eq!(reaction.name, reactions[1].name);
    assert_eq!(reaction.coefficient("g6p_c"), Some(-1.0));
    assert_eq!(reaction.species["g6p_c"].formula.as_deref(), Some("C6H11O9P"));
    assert_eq!(reaction.species["f6p_c"].formula, None);
    assert!(reaction.annotation.contains_key(DATABASE_LINKS));
    assert_eq!(reaction.annotation[MODELS_CONTAINING_REACTION], json!(["e_coli_core"]));
    Ok(())
}

#[tokio::test]
async fn test_model_reaction_with_copies() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/models/iJO1366/reactions/FDH4pp");
        then.status(200).json_body(json!({
            "bigg_id": "FDH4pp",
            "name": "Formate dehydrogenase (quinone-8: 2 protons) (periplasm)",
            "count": 2,
            "pseudoreaction": false,
            "escher_maps": [],
            "database_links": {},
            "metabolites": [
                {"bigg_id": "for", "name": "Formate", "compartment_bigg_id": "p", "stoichiometry": -1},
                {"bigg_id": "co2", "name": "CO2 CO2", "compartment_bigg_id": "p", "stoichiometry": 1}
            ],
            "results": [
                {"copy_number": 1, "gene_reaction_rule": "b3892 and b3893 and b3894", "genes": [{"bigg_id": "b3892", "name": "fdoI"}, {"bigg_id": "b3893", "name": "fdoH"}, {"bigg_id": "b3894", "name": "fdoG"}], "lower_bound": 0, "upper_bound": 1000, "subsystem": "Oxidative Phosphorylation"},
                {"copy_number": 2, "gene_reaction_rule": "b1474 and b1475 and b1476", "genes": [{"bigg_id": "b1474", "name": "fdnG"}, {"bigg_id": "b1475", "name": "fdnH"}, {"bigg_id": "b1476", "name": "fdnI"}], "lower_bound": 0, "upper_bound": 1000, "subsystem": "Oxidative Phosphorylation"}
            ]
        }));
    });

    let (reaction, copies) = client_for(&server)
        .get_model_reaction("iJO1366", "FDH4pp", &EntityRegistry::new())
        .await?;

    api_mock.assert();
    assert_eq!(reaction.id, "FDH4pp");
    assert_eq!(copies.len(), 2);
    assert_eq!(copies[0].id, "FDH4pp_1");
    assert_eq!(copies[1].id, "FDH4pp_2");
    assert_eq!(copies[1].gene_reaction_rule, "b1474 and b1475 and b1476");
    assert!(copies.iter().all(|copy| copy.coefficient("for_p") == Some(-1.0)));
    Ok(())
}

#[tokio::test]
async fn test_enrich_existing_reaction_in_model() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/models/e_coli_core/reactions/PGI");
        then.status(200).json_body(json!({
            "bigg_id": "PGI",
            "name": "Glucose-6-phosphate isomerase",
            "count": 1,
            "pseudoreaction": false,
            "escher_maps": [{"map_name": "e_coli_core.Core metabolism", "element_id": "1577"}],
            "database_links": {},
            "metabolites": [
                {"bigg_id": "g6p", "name": "D-Glucose 6-phosphate", "compartment_bigg_id": "c", "stoichiometry": -1},
                {"bigg_id": "f6p", "name": "D-Fructose 6-phosphate", "compartment_bigg_id": "c", "stoichiometry": 1}
            ],
            "results": [{"copy_number": 1, "gene_reaction_rule": "b4025", "genes": [{"bigg_id": "b4025", "name": "pgi"}], "lower_bound": -1000, "upper_bound": 1000}]
        }));
    });

    let mut existing = Reaction::new("PGI", "PGI");
    existing
        .annotation
        .insert(ESCHER_MAPS.to_string(), json!([{"map_name": "iJO1366.Central metabolism"}]));

    let (reaction, copies) = client_for(&server)
        .enrich_model_reaction("e_coli_core", existing, &EntityRegistry::new())
        .await?;

    api_mock.assert();
    assert!(copies.is_empty());
    assert_eq!(reaction.name, "PGI");
    assert_eq!(reaction.gene_reaction_rule, "b4025");
    assert_eq!(reaction.annotation[ESCHER_MAPS].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_metabolite_lookups() -> Result<()> {
    let server = MockServer::start();
    let universal_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v2/universal/metabolites/glc__D");
        then.status(200).json_body(json!({
            "bigg_id": "glc__D",
            "name": "D-Glucose",
            "formulae": ["C6H12O6"],
            "charges": [0],
            "database_links": {"CHEBI": [{"link": "http://identifiers.org/chebi/CHEBI:4167", "id": "CHEBI:4167"}]},
            "compartments_in_models": [
                {"bigg_id": "e", "model_bigg_id": "e_coli_core", "organism": "Escherichia coli"},
                {"bigg_id": "p", "model_bigg_id": "iJO1366", "organism": "Escherichia coli"}
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/models/e_coli_core/metabolites");
        then.status(200).json_body(json!({
            "results_count": 1,
            "results": [{"bigg_id": "glc__D", "name": "D-Glucose", "compartment_bigg_id": "e", "model_bigg_id": "e_coli_core", "organism": "Escherichia coli"}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/models/e_coli_core/metabolites/glc__D_e");
        then.status(200).json_body(json!({
            "bigg_id": "glc__D",
            "name": "D-Glucose",
            "charge": 0,
            "formula": "C6H12O6",
            "compartment_bigg_id": "e",
            "database_links": {}
        }));
    });

    let client = client_for(&server);

    // species id resolves to its universal metabolite
    let (universal, species) = client.get_metabolite("glc__D_e").await?;
    universal_mock.assert();
    assert_eq!(universal.id, "glc__D");
    assert_eq!(species["e"].id, "glc__D_e");
    assert_eq!(species["p"].id, "glc__D_p");

    let listed = client.list_model_metabolites("e_coli_core").await?;
    assert_eq!(listed.len(), 1);

    let full = client.get_model_metabolite("e_coli_core", &listed[0].id).await?;
    assert_eq!(full.id, listed[0].id);
    assert_eq!(full.compartment.as_deref(), Some("e"));
    assert_eq!(full.charge, Some(0));
    Ok(())
}

#[tokio::test]
async fn test_genes() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/models/e_coli_core/genes");
        then.status(200).json_body(json!({
            "results_count": 1,
            "results": [{"bigg_id": "b4025", "name": "pgi", "organism": "Escherichia coli", "model_bigg_id": "e_coli_core"}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/models/e_coli_core/genes/b4025");
        then.status(200).json_body(json!({
            "bigg_id": "b4025",
            "name": "pgi",
            "database_links": {"NCBI GI": [{"id": "16131851"}]},
            "protein_sequence": "MKNINPTQTAAWQALQKHFDEMKDVTIADLFAKDGDRFSKFSATFDDQMLVDYSKNRITEETLAKLQDLAKECDLAGAIKSMFSGEKINRTENRAVLHVALRNRSNTPILVDGKDVMPEVNAVLEKMKTFSEAIISGEWKGYTGKAITDVVNIGIGGSDLGPYMVTEALRPYKNHLNMHFVSNVDGTHIAEVLKKVNPETTLFLVASKTFTTQETMTNAHSARDWFLKAAGDEKHVAKHFAALSTNAKAVGEFGIDTANMFEFWDWVGGRYSLWSAIGLSIVLSIGFDNFVELLSGAHAMDKHFSTTPAEKNLPVLLALIGIWYNNFFGAETEAILPYDQYMHRFAAYFQQGNMESNGKYVDRNGNVVDYQTGPIIWGEPGTNGQHAFYQLIHQGTKMVPCDFIAPAITHNPLSDHHQKLLSNFFAQTEALAFGKSREVVEQEYRDQGKDPATLDYVVPFKVFEGNRPTNSILLREITPFSLGALIALYEHKIFTQGVILNIFTFDQWGVELGKQLANRILPELKDDKEISSHDSSTNGLINRYKAWRG"
        }));
    });

    let client = client_for(&server);
    let genes = client.list_model_genes("e_coli_core").await?;
    assert_eq!(genes.len(), 1);
    assert_eq!(genes[0].annotation[ORGANISM], json!("Escherichia coli"));

    let gene = client.get_model_gene("e_coli_core", &genes[0].id).await?;
    assert_eq!(gene.id, "b4025");
    assert_eq!(gene.name, "pgi");
    assert!(gene.annotation.contains_key(DATABASE_LINKS));
    Ok(())
}

#[tokio::test]
async fn test_unknown_identifiers_fail_with_not_found() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path_contains("non-existent");
        then.status(404).body("<html>404</html>");
    });

    let client = client_for(&server);
    let registry = EntityRegistry::new();

    assert!(client.model_details("non-existent").await.unwrap_err().is_not_found());
    assert!(client.get_reaction("non-existent", &registry).await.unwrap_err().is_not_found());
    assert!(client
        .get_model_reaction("iJO1366", "non-existent", &registry)
        .await
        .unwrap_err()
        .is_not_found());
    assert!(client.get_metabolite("non-existent").await.unwrap_err().is_not_found());
    assert!(client
        .get_model_gene("iJO1366", "non-existent")
        .await
        .unwrap_err()
        .is_not_found());
    Ok(())
}
