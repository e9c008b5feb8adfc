use anyhow::Result;
use correios_api::{Address, AuthMode, Client, Party, PrepostRequest, PriceRequest};

fn main() -> Result<()> {
    let mut client = Client::from_env()?;
    client.refresh_token(AuthMode::PostageCard)?;

    // 03220 - SEDEX CONTRATO AG
    // 03298 - PAC CONTRATO AG
    // 04227 - CORREIOS MINI ENVIOS CTR AG
    let quotes = client.price(&PriceRequest {
        product_codes: vec!["03220".into(), "03298".into()],
        origin_zip: "33110580".into(),
        destination_zip: "33145160".into(),
        weight: "300".into(),
        object_type: "2".into(),
        height: "4".into(),
        width: "12".into(),
        length: "17".into(),
        declared_value: None,
        posting_date: "06/04/2024".into(),
        add_ons: vec!["RR".into()],
    })?;
    for quote in &quotes {
        println!("{}: R$ {}", quote.product_code, quote.final_price);
    }

    let recipient = Party {
        name: "LUIZ CARLOS".into(),
        mobile_area_code: "31".into(),
        mobile: "999999999".into(),
        tax_id: "29939998207".into(),
        address: Address {
            postal_code: "17217850".into(),
            street: "Rua dos Bobos".into(),
            number: "0".into(),
            complement: Some("casa".into()),
            district: "Jardim Cial".into(),
            city: "São Paulo".into(),
            state: "SP".into(),
        },
    };

    // Sender comes from CORREIOS_SENDER (or `sender:` in .correiosrc).
    let receipt = client.register(&PrepostRequest {
        service: "03298".into(),
        add_ons: vec!["RR".into(), "VD".into()],
        recipient,
        sender: None,
        declared_value: Some("214.10".into()),
        neighbor_instructions: None,
        fiscal_note_number: Some("349".into()),
        fiscal_note_key: Some("31241441856872000179550010000003491717558899".into()),
        weight: "460".into(),
        height: "4".into(),
        width: "12".into(),
        length: "17".into(),
        request_collection: "N".into(),
        posting_date: "10/04/2024".into(),
        payment_mode: "2".into(),
        reverse_logistics: "N".into(),
    })?;

    println!(
        "registered pre-shipment {:?}, tracking code {:?}",
        receipt.id, receipt.object_code
    );

    Ok(())
}
